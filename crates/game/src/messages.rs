//! On-screen message log displayed over the game view.
//!
//! This is also the best-effort user-visible channel for degraded states:
//! the simulation keeps running and tells the player what it dropped.

/// One on-screen message.
pub struct GameMessage {
    pub text: String,
    pub color: [f32; 4],
    pub time_remaining: f32,
}

/// Manages the on-screen message log.
pub struct GameMessages {
    pub messages: Vec<GameMessage>,
    pub max_visible: usize,
    default_duration: f32,
}

impl GameMessages {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max_visible: 12,
            default_duration: 6.0,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, color: [f32; 4]) {
        self.messages.push(GameMessage {
            text: text.into(),
            color,
            time_remaining: self.default_duration,
        });
        if self.messages.len() > 50 {
            self.messages.remove(0);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, [1.0, 1.0, 1.0, 1.0]);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(text, [0.3, 1.0, 0.3, 1.0]);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(text, [1.0, 0.9, 0.3, 1.0]);
    }

    pub fn update(&mut self, dt: f32) {
        for msg in &mut self.messages {
            msg.time_remaining -= dt;
        }
        self.messages.retain(|m| m.time_remaining > 0.0);
    }
}

impl Default for GameMessages {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_expire() {
        let mut log = GameMessages::new();
        log.info("hello");
        log.update(7.0);
        assert!(log.messages.is_empty());
    }

    #[test]
    fn log_is_bounded() {
        let mut log = GameMessages::new();
        for i in 0..80 {
            log.info(format!("msg {}", i));
        }
        assert!(log.messages.len() <= 50);
    }
}
