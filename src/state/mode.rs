/// game phases as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Paused = 0,
    Scatter = 1,
    Chase = 2,
}

impl Mode {
    /// whether the game clock is running
    pub fn running(&self) -> bool {
        !matches!(self, Mode::Paused)
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode as u8
    }
}
impl TryFrom<u8> for Mode {
    type Error = anyhow::Error;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Mode::Paused),
            1 => Ok(Mode::Scatter),
            2 => Ok(Mode::Chase),
            n => Err(anyhow::anyhow!("invalid game mode byte {}", n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_u8() {
        for mode in [Mode::Paused, Mode::Scatter, Mode::Chase] {
            assert_eq!(mode, Mode::try_from(u8::from(mode)).unwrap());
        }
        assert!(Mode::try_from(3).is_err());
    }
}

impl crate::Arbitrary for Mode {
    fn random() -> Self {
        use rand::Rng;
        Mode::try_from(rand::rng().random_range(0..3u8)).expect("mode byte in range")
    }
}
