//! Commands of the interactive line protocol.

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// `position startpos` or `position [fen] <FEN>`. `None` is the starting
    /// position.
    SetPosition { fen: Option<String> },
    Moves,
    Move(String),
    Undo,
    Promote(String),
    Perft { depth: u8 },
    Divide { depth: u8 },
    Display,
    Fen,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_depth(parts: &[&str]) -> Option<u8> {
    match parts {
        [_, depth] => depth.parse().ok(),
        _ => None,
    }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        let parts: Vec<&str> = input.split_whitespace().collect();

        let Some(&command) = parts.first() else {
            return Self::Empty;
        };

        match (command, parts.len()) {
            ("position", 2) if parts[1] == "startpos" => Self::SetPosition { fen: None },
            ("position", 2..) => Self::SetPosition {
                fen: Some(parts[1..].join(" ")),
            },
            ("moves", 1) => Self::Moves,
            ("move", 2) => Self::Move(parts[1].to_string()),
            ("undo", 1) => Self::Undo,
            ("promote", 2) => Self::Promote(parts[1].to_string()),
            ("perft", _) => match parse_depth(&parts) {
                Some(depth) => Self::Perft { depth },
                None => Self::Unknown(input.to_string()),
            },
            ("divide", _) => match parse_depth(&parts) {
                Some(depth) => Self::Divide { depth },
                None => Self::Unknown(input.to_string()),
            },
            ("d", 1) => Self::Display,
            ("fen", 1) => Self::Fen,
            ("quit", 1) => Self::Quit,
            _ => Self::Unknown(input.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_position() {
        assert_eq!(
            Command::parse("position startpos"),
            Command::SetPosition { fen: None }
        );
        assert_eq!(
            Command::parse("position fen 8/8/8/8/8/8/8/k6K w - - 0 1\n"),
            Command::SetPosition {
                fen: Some("fen 8/8/8/8/8/8/8/k6K w - - 0 1".to_string())
            }
        );
        assert_eq!(
            Command::parse("position"),
            Command::Unknown("position".to_string())
        );
    }

    #[test]
    fn parse_moves() {
        assert_eq!(Command::parse("moves"), Command::Moves);
        assert_eq!(
            Command::parse("move e2e4"),
            Command::Move("e2e4".to_string())
        );
        assert_eq!(Command::parse("undo"), Command::Undo);
        assert_eq!(
            Command::parse("promote q"),
            Command::Promote("q".to_string())
        );
        assert_eq!(
            Command::parse("move"),
            Command::Unknown("move".to_string())
        );
    }

    #[test]
    fn parse_perft() {
        assert_eq!(Command::parse("perft 3"), Command::Perft { depth: 3 });
        assert_eq!(Command::parse("divide 2"), Command::Divide { depth: 2 });
        assert_eq!(
            Command::parse("perft -1"),
            Command::Unknown("perft -1".to_string())
        );
        assert_eq!(
            Command::parse("perft"),
            Command::Unknown("perft".to_string())
        );
    }

    #[test]
    fn parse_misc() {
        assert_eq!(Command::parse("d"), Command::Display);
        assert_eq!(Command::parse("fen"), Command::Fen);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("   \n"), Command::Empty);
        assert_eq!(
            Command::parse("unknown command"),
            Command::Unknown("unknown command".to_string())
        );
    }
}
