use super::direction::Direction;

/// A hall call as it travels from a call panel to the dispatcher.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallMessage {
    pub floor: i32,
    pub direction: Direction,
}

impl CallMessage {
    pub fn new(floor: i32, direction: Direction) -> Self {
        CallMessage { floor, direction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_panel_json() {
        let call: CallMessage = serde_json::from_str(r#"{"floor":-1,"direction":"up"}"#).unwrap();
        assert_eq!(call, CallMessage::new(-1, Direction::Up));
    }
}
