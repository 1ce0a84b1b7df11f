/// Output held for an instance that has no bound terminal yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    pending: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append data in arrival order
    pub fn push(&mut self, data: &str) {
        self.pending.push_str(data);
    }

    pub fn as_str(&self) -> &str {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consume the buffer, yielding everything pushed so far
    pub fn take(self) -> String {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_concatenates_in_order() {
        let mut buffer = OutputBuffer::new();
        assert!(buffer.is_empty());

        buffer.push("Welcome");
        buffer.push("\r\n");
        buffer.push("$ ");

        assert_eq!(buffer.as_str(), "Welcome\r\n$ ");
        assert_eq!(buffer.len(), 11);
        assert_eq!(buffer.take(), "Welcome\r\n$ ");
    }
}
