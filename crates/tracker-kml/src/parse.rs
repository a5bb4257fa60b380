//! Streaming placemark reader built on `quick_xml`'s pull parser.

use quick_xml::events::Event;
use tracker_core::location::NewLocation;

use crate::{Error, ParsedKml, Result, SkippedPlacemark};

/// Text gathered while inside one `<Placemark>`.
#[derive(Default)]
struct Draft {
  name:  String,
  point: Option<String>,
  ring:  Option<String>,
}

impl Draft {
  /// Route a text node to the field it belongs to, given the open element
  /// path (outermost first).
  fn absorb(&mut self, path: &[Vec<u8>], text: &str) {
    let Some((current, ancestors)) = path.split_last() else {
      return;
    };
    match current.as_slice() {
      // Only the placemark's own name; folder and style names also use <name>.
      b"name" if ancestors.last().is_some_and(|p| p == b"Placemark") => {
        self.name.push_str(text);
      }
      b"coordinates" => {
        if ancestors.iter().any(|p| p == b"Point") {
          self.point.get_or_insert_default().push_str(text);
        } else if ancestors.iter().any(|p| p == b"outerBoundaryIs") {
          self.ring.get_or_insert_default().push_str(text);
        }
      }
      _ => {}
    }
  }

  fn finish(self) -> Result<NewLocation, SkippedPlacemark> {
    let name = self.name.trim().to_owned();
    let skip = |name: &str, reason| SkippedPlacemark { name: name.to_owned(), reason };

    if name.is_empty() {
      return Err(skip(&name, Error::MissingName));
    }
    // A point wins over a polygon when a placemark carries both.
    let Some(coordinates) = self.point.or(self.ring) else {
      return Err(skip(&name, Error::MissingGeometry));
    };
    match first_coordinate(&coordinates) {
      Ok((latitude, longitude)) => Ok(NewLocation { name, latitude, longitude }),
      Err(reason) => Err(skip(&name, reason)),
    }
  }
}

pub fn parse_document(xml: &[u8]) -> Result<ParsedKml> {
  let mut reader = quick_xml::Reader::from_reader(xml);
  reader.config_mut().trim_text(true);

  let mut parsed = ParsedKml::default();
  let mut path: Vec<Vec<u8>> = Vec::new();
  let mut draft: Option<Draft> = None;
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e)) => {
        let name_buf = e.name();
        let local = local_name(name_buf.as_ref());
        if local == b"Placemark" {
          draft = Some(Draft::default());
        }
        path.push(local.to_vec());
      }
      Ok(Event::End(ref e)) => {
        let name_buf = e.name();
        if local_name(name_buf.as_ref()) == b"Placemark" {
          match draft.take().map(Draft::finish) {
            Some(Ok(location)) => parsed.locations.push(location),
            Some(Err(skipped)) => parsed.skipped.push(skipped),
            None => {}
          }
        }
        path.pop();
      }
      Ok(Event::Text(ref e)) => {
        if let Some(d) = draft.as_mut() {
          let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
          d.absorb(&path, &text);
        }
      }
      Ok(Event::CData(ref e)) => {
        if let Some(d) = draft.as_mut() {
          d.absorb(&path, &String::from_utf8_lossy(e));
        }
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
    buf.clear();
  }

  Ok(parsed)
}

fn local_name(name: &[u8]) -> &[u8] {
  // strip "prefix:" if present
  if let Some(pos) = name.iter().rposition(|&b| b == b':') {
    &name[pos + 1..]
  } else {
    name
  }
}

/// Take the first `lon,lat[,alt]` tuple of a coordinates block and return it
/// as `(latitude, longitude)`. Tuples are separated by any whitespace.
fn first_coordinate(text: &str) -> Result<(f64, f64)> {
  let tuple = text.split_whitespace().next().unwrap_or_default();
  let mut parts = tuple.split(',');
  let (Some(lon), Some(lat)) = (parts.next(), parts.next()) else {
    return Err(Error::ShortCoordinate(tuple.to_owned()));
  };
  Ok((number(lat)?, number(lon)?))
}

fn number(s: &str) -> Result<f64> {
  s.parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .ok_or_else(|| Error::InvalidNumber(s.to_owned()))
}
