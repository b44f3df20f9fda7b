//! Pre-pass over the URDF text before it reaches `urdf-rs`
//!
//! `urdf-rs` requires attributes that real-world URDF files often leave out. The
//! document is streamed through `quick-xml` and the missing attributes are filled in
//! with their defaults:
//! - `<limit>`: `lower`, `upper`, `effort` and `velocity` default to 0
//! - `<material>`: `name` defaults to empty (an anonymous inline material)

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::LoadError;

const LIMIT_ATTRIBUTES: [&str; 4] = ["lower", "upper", "effort", "velocity"];

/// Rewrite `xml` with the missing attributes filled in
///
/// Fails with [`LoadError::MissingRobot`] when the document has no `<robot>` element,
/// and with [`LoadError::Parse`] on malformed XML.
pub(crate) fn normalize(xml: &str) -> Result<String, LoadError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut state = State::default();

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => Event::Start(state.patch(e)),
            Ok(Event::Empty(e)) => Event::Empty(state.patch(e)),
            Ok(event) => event,
            Err(e) => {
                return Err(LoadError::Parse(format!(
                    "XML error at byte {}: {}",
                    reader.error_position(),
                    e
                )));
            }
        };
        writer
            .write_event(event)
            .map_err(|e| LoadError::Parse(e.to_string()))?;
    }

    if !state.seen_robot {
        return Err(LoadError::MissingRobot);
    }
    String::from_utf8(writer.into_inner()).map_err(|e| LoadError::Parse(e.to_string()))
}

#[derive(Default)]
struct State {
    seen_robot: bool,
    /// Name of the innermost `<joint>` seen so far, for diagnostics
    joint: Option<String>,
}

impl State {
    fn patch<'a>(&mut self, mut element: BytesStart<'a>) -> BytesStart<'a> {
        let name = element.name().as_ref().to_vec();
        match name.as_slice() {
            b"robot" => self.seen_robot = true,
            b"joint" => self.joint = attribute(&element, "name"),
            b"limit" => {
                let missing: Vec<&str> = LIMIT_ATTRIBUTES
                    .into_iter()
                    .filter(|key| attribute(&element, key).is_none())
                    .collect();
                if !missing.is_empty() {
                    tracing::debug!(
                        "Joint '{}': <limit> without {}, using 0",
                        self.joint.as_deref().unwrap_or("?"),
                        missing.join("/")
                    );
                }
                for key in missing {
                    element.push_attribute((key, "0"));
                }
            }
            b"material" => {
                if attribute(&element, "name").is_none() {
                    tracing::warn!("<material> without a name, treating it as anonymous");
                    element.push_attribute(("name", ""));
                }
            }
            _ => {}
        }
        element
    }
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}
