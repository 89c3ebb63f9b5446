//! Property-based tests for the data model and drag payload codec.
//!
//! Uses proptest to verify:
//! 1. Any task id survives encode → decode through a drag payload.
//! 2. Arbitrary text never panics the decoder, and non-numeric text never
//!    decodes to a task.
//! 3. Both author shapes normalise to the same author.

use proptest::prelude::*;

use taskboard_proto::comment::{Author, Comment};
use taskboard_proto::drag::{self, DragPayload, DropEffect};
use taskboard_proto::task::TaskId;

proptest! {
    #[test]
    fn task_id_survives_drag_payload(id in any::<i64>()) {
        let payload = DragPayload::for_task(TaskId::new(id));
        prop_assert_eq!(payload.effect_allowed, DropEffect::Move);
        prop_assert_eq!(payload.task_id(), Some(TaskId::new(id)));
    }

    #[test]
    fn decode_never_panics(text in ".*") {
        let _ = drag::decode(&text);
    }

    #[test]
    fn text_without_digits_never_decodes(text in "[^0-9]*") {
        prop_assert_eq!(drag::decode(&text), None);
    }

    #[test]
    fn author_shapes_agree(name in "[A-Za-z ]{1,20}") {
        let escaped = serde_json::to_string(&name).unwrap_or_default();
        let object: Comment = serde_json::from_str(&format!(
            r#"{{"id":1,"text":"t","author":{{"name":{escaped}}}}}"#
        )).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let array: Comment = serde_json::from_str(&format!(
            r#"{{"id":1,"text":"t","author":[{{"name":{escaped}}}]}}"#
        )).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&object.author, &array.author);
        prop_assert_eq!(object.author, Author::new(name));
    }
}
