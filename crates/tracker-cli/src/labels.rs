//! Display strings for the supported interface languages.
//!
//! The language is chosen once per invocation (flag, environment, or config
//! file) and passed down; nothing here is mutable.

use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  En,
  Ko,
}

/// Every user-facing word the CLI prints.
#[derive(Debug)]
pub struct Labels {
  pub teams:              &'static str,
  pub locations:          &'static str,
  pub assign:             &'static str,
  pub leader:             &'static str,
  pub preached:           &'static str,
  pub not_preached:       &'static str,
  pub last_visit:         &'static str,
  pub never:              &'static str,
  pub visits:             &'static str,
  pub planned:            &'static str,
  pub assignments:        &'static str,
  pub completed:          &'static str,
  pub pending:            &'static str,
  pub total_locations:    &'static str,
  pub preached_locations: &'static str,
  pub active_teams:       &'static str,
  pub total_visits:       &'static str,
  pub nothing:            &'static str,
}

static EN: Labels = Labels {
  teams:              "Teams",
  locations:          "Locations",
  assign:             "Assign",
  leader:             "leader",
  preached:           "preached",
  not_preached:       "not preached",
  last_visit:         "last visit",
  never:              "never",
  visits:             "Visits",
  planned:            "Planned visits",
  assignments:        "Assignments",
  completed:          "completed",
  pending:            "pending",
  total_locations:    "Total locations",
  preached_locations: "Preached locations",
  active_teams:       "Active teams (24h)",
  total_visits:       "Total visits",
  nothing:            "(none)",
};

static KO: Labels = Labels {
  teams:              "팀",
  locations:          "위치",
  assign:             "할당",
  leader:             "리더",
  preached:           "전도 완료",
  not_preached:       "전도 전",
  last_visit:         "최근 방문",
  never:              "없음",
  visits:             "방문",
  planned:            "방문 계획",
  assignments:        "할당 목록",
  completed:          "완료",
  pending:            "진행 중",
  total_locations:    "전체 위치",
  preached_locations: "전도한 위치",
  active_teams:       "활동 팀 (24시간)",
  total_visits:       "전체 방문",
  nothing:            "(없음)",
};

impl Language {
  pub fn labels(self) -> &'static Labels {
    match self {
      Language::En => &EN,
      Language::Ko => &KO,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn languages_have_distinct_labels() {
    assert_eq!(Language::En.labels().teams, "Teams");
    assert_eq!(Language::Ko.labels().teams, "팀");
    assert_eq!(Language::Ko.labels().assign, "할당");
  }

  #[test]
  fn language_parses_from_config_text() {
    #[derive(Deserialize)]
    struct File {
      lang: Language,
    }
    let file: File = toml::from_str("lang = \"ko\"").unwrap();
    assert_eq!(file.lang, Language::Ko);
  }
}
