//! Frame decoding into sensor records.
//!
//! A frame is a run of sibling elements with no enclosing root, so it
//! is wrapped in a synthetic `<root>` element before parsing. Decoding
//! yields one record per descendant element in document order; the
//! engine decides which tags it tracks.

use crate::error::BridgeResult;
use roxmltree::{Document, Node};

/// One decoded sensor entry within a frame.
///
/// Records are ephemeral views over a single refresh cycle; only the
/// `id` field carries identity across cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRecord {
    /// Element name, used as the sensor type tag.
    pub tag: String,
    /// Stable identity, from the record's `id` child.
    pub id: Option<String>,
    /// Display label, from the record's `label` child.
    pub label: Option<String>,
    /// Raw decimal value text, from the record's `value` child.
    pub value: Option<String>,
}

/// Decode one raw frame into records.
///
/// # Errors
/// `BridgeError::MalformedFrame` if the wrapped text is not well-formed
/// markup. Expected when the producer was mid-write during the read;
/// callers treat it as a transient, whole-cycle miss.
pub fn decode_frame(text: &str) -> BridgeResult<Vec<SensorRecord>> {
    let wrapped = format!("<root>{text}</root>");
    let document = Document::parse(&wrapped)?;

    Ok(document
        .root_element()
        .descendants()
        .filter(|node| node.is_element())
        .map(|node| SensorRecord {
            tag: node.tag_name().name().to_string(),
            id: child_text(node, "id"),
            label: child_text(node, "label"),
            value: child_text(node, "value"),
        })
        .collect())
}

/// Text content of the first direct child element with the given name.
fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
        .and_then(|child| child.text())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_fragments_decode_without_enclosing_root() {
        let records = decode_frame(
            "<temp><id>t1</id><label>CPU</label><value>42.0</value></temp>\
             <pwr><id>p1</id><value>500</value></pwr>",
        )
        .unwrap();

        let temp = records.iter().find(|r| r.tag == "temp").unwrap();
        assert_eq!(temp.id.as_deref(), Some("t1"));
        assert_eq!(temp.label.as_deref(), Some("CPU"));
        assert_eq!(temp.value.as_deref(), Some("42.0"));

        let pwr = records.iter().find(|r| r.tag == "pwr").unwrap();
        assert_eq!(pwr.id.as_deref(), Some("p1"));
        assert_eq!(pwr.label, None);
        assert_eq!(pwr.value.as_deref(), Some("500"));
    }

    #[test]
    fn records_preserve_document_order() {
        let records = decode_frame(
            "<temp><id>a</id></temp><temp><id>b</id></temp><temp><id>c</id></temp>",
        )
        .unwrap();

        let ids: Vec<_> = records.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn unbalanced_tags_fail_to_decode() {
        assert!(decode_frame("<temp><id>t1</id><value>42.").is_err());
    }

    #[test]
    fn truncated_tail_fails_to_decode() {
        // A torn read can cut a frame anywhere, including inside a tag name.
        assert!(decode_frame("<temp><id>t1</id></temp><pw").is_err());
    }

    #[test]
    fn empty_text_decodes_to_no_sensor_records() {
        let records = decode_frame("").unwrap();
        assert!(records.iter().all(|r| r.tag == "root"));
    }

    #[test]
    fn field_elements_appear_as_records_without_identity() {
        // Descendant traversal includes the id/label/value elements
        // themselves; they carry no fields and never match anything.
        let records = decode_frame("<temp><id>t1</id><value>1</value></temp>").unwrap();
        let id_element = records.iter().find(|r| r.tag == "id").unwrap();
        assert_eq!(id_element.id, None);
        assert_eq!(id_element.value, None);
    }
}
