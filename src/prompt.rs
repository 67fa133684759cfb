/// Data lines accumulated between two commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptBuffer {
    lines: Vec<String>,
}

impl PromptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Hands the accumulated lines out and leaves the buffer empty.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Renders the prompt as one string, each line followed by `separator`.
    ///
    /// The separator is never used to split the prompt back apart.
    pub fn joined(&self, separator: char) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push(separator);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_preserves_order_and_resets() {
        let mut prompt = PromptBuffer::new();
        prompt.push("a");
        prompt.push("b");
        assert_eq!(prompt.take(), vec!["a".to_string(), "b".to_string()]);
        assert!(prompt.is_empty());
    }

    #[test]
    fn joined_appends_separator_after_each_line() {
        let mut prompt = PromptBuffer::new();
        prompt.push("a");
        prompt.push("b");
        assert_eq!(prompt.joined('\t'), "a\tb\t");
        assert_eq!(PromptBuffer::new().joined('\t'), "");
    }

    #[test]
    fn line_containing_separator_stays_whole() {
        let mut prompt = PromptBuffer::new();
        prompt.push("x\ty");
        assert_eq!(prompt.len(), 1);
        assert_eq!(prompt.lines(), ["x\ty".to_string()]);
    }
}
