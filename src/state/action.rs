use super::direction::Direction;

/// one committed plan step: a heading and the tick budget allotted to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub delay: u8,
    pub direction: Direction,
}

impl Action {
    pub fn new(delay: u8, direction: Direction) -> Self {
        Self { delay, direction }
    }
}
