use crate::scene::{InputAction, PIANO_INTERACTION};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Radians per arrow-key press.
pub const ORBIT_STEP: f32 = 0.1;

/// Key bindings for the showroom. Only presses produce actions.
pub fn action_for_key(key: PhysicalKey, pressed: bool) -> Option<InputAction> {
    if !pressed {
        return None;
    }
    match key {
        PhysicalKey::Code(KeyCode::Escape) => Some(InputAction::Cancel),
        PhysicalKey::Code(KeyCode::KeyP) => Some(InputAction::Toggle(PIANO_INTERACTION.to_string())),
        PhysicalKey::Code(KeyCode::ArrowLeft) => Some(InputAction::Orbit {
            yaw: -ORBIT_STEP,
            pitch: 0.0,
        }),
        PhysicalKey::Code(KeyCode::ArrowRight) => Some(InputAction::Orbit {
            yaw: ORBIT_STEP,
            pitch: 0.0,
        }),
        PhysicalKey::Code(KeyCode::ArrowUp) => Some(InputAction::Orbit {
            yaw: 0.0,
            pitch: ORBIT_STEP,
        }),
        PhysicalKey::Code(KeyCode::ArrowDown) => Some(InputAction::Orbit {
            yaw: 0.0,
            pitch: -ORBIT_STEP,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_cancels() {
        assert_eq!(
            action_for_key(PhysicalKey::Code(KeyCode::Escape), true),
            Some(InputAction::Cancel)
        );
        assert_eq!(action_for_key(PhysicalKey::Code(KeyCode::Escape), false), None);
    }

    #[test]
    fn p_toggles_the_piano() {
        assert_eq!(
            action_for_key(PhysicalKey::Code(KeyCode::KeyP), true),
            Some(InputAction::Toggle("piano".to_string()))
        );
        assert_eq!(action_for_key(PhysicalKey::Code(KeyCode::KeyQ), true), None);
    }

    #[test]
    fn arrows_orbit() {
        assert_eq!(
            action_for_key(PhysicalKey::Code(KeyCode::ArrowRight), true),
            Some(InputAction::Orbit {
                yaw: ORBIT_STEP,
                pitch: 0.0
            })
        );
        assert_eq!(action_for_key(PhysicalKey::Code(KeyCode::ArrowDown), false), None);
    }
}
