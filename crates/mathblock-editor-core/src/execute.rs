//! Action execution for editor coordinators.
//!
//! `execute_action` is the central dispatch point hosts use to feed user
//! intent into an [`EditorCoordinator`]. Returns true if the action was
//! handled.

use crate::actions::EditorAction;
use crate::coordinator::EditorCoordinator;
use crate::platform::EditorPlatform;

/// Execute an editor action.
pub fn execute_action<P: EditorPlatform>(
    editor: &mut EditorCoordinator<P>,
    action: &EditorAction,
) -> bool {
    match action {
        EditorAction::Activate { id } => editor.activate(*id),
        EditorAction::Blur { id } => editor.blur(*id),
        EditorAction::Done { id } => editor.done(*id),
        EditorAction::Input { id, text } => editor.input(*id, text),
        EditorAction::InsertAfter { anchor, kind } => {
            editor.insert_after(*anchor, *kind);
            true
        }
        EditorAction::Remove { id } => editor.remove(*id),
        EditorAction::Key { focused, press } => editor.handle_key(*focused, press).is_handled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::keymap::KeyPress;
    use crate::platform::PlatformError;
    use crate::surface::MathInputSurface;
    use crate::types::{BlockId, BlockKind, DeviceClass};

    /// Platform for flows that never focus anything.
    struct NoPlatform;

    impl EditorPlatform for NoPlatform {
        fn create_math_surface(
            &mut self,
            _id: BlockId,
            _seed: &str,
        ) -> Result<Box<dyn MathInputSurface>, PlatformError> {
            Err("no math widget".into())
        }

        fn focus_text(&mut self, _id: BlockId) -> Result<(), PlatformError> {
            Ok(())
        }
    }

    fn make_editor(value: &str) -> EditorCoordinator<NoPlatform> {
        EditorCoordinator::new(value, EditorConfig::default(), DeviceClass::Pointer, NoPlatform)
            .unwrap()
    }

    #[test]
    fn test_action_script() {
        let mut editor = make_editor("Solve ");
        let first = editor.document().blocks()[0].id;

        let math = BlockId(1);
        let script = vec![
            EditorAction::Activate { id: first },
            EditorAction::Key {
                focused: first,
                press: KeyPress::plain("m").with_ctrl(),
            },
            EditorAction::Input {
                id: math,
                text: "x^2".into(),
            },
            EditorAction::Done { id: math },
            EditorAction::InsertAfter {
                anchor: math,
                kind: BlockKind::Text,
            },
            EditorAction::Input {
                id: BlockId(2),
                text: " now".into(),
            },
            EditorAction::Blur { id: BlockId(2) },
        ];
        for action in &script {
            assert!(execute_action(&mut editor, action), "{action:?} not handled");
        }

        assert_eq!(editor.value(), "Solve $$x^2$$ now");
        assert!(
            editor
                .document()
                .blocks()
                .iter()
                .all(|b| !b.is_editing() || b.id == first)
        );
    }

    #[test]
    fn test_unhandled_actions_return_false() {
        let mut editor = make_editor("abc");
        let id = editor.document().blocks()[0].id;
        assert!(!execute_action(
            &mut editor,
            &EditorAction::Key {
                focused: id,
                press: KeyPress::plain("a"),
            }
        ));
        assert!(!execute_action(&mut editor, &EditorAction::Remove { id: BlockId(50) }));
    }
}
