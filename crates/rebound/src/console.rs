use rebound_core::{SinkError, StyleSink};
use std::io::{self, Stdout, Write};

/// Prints every write as `<element>.style.<property> = <value>`.
pub struct ConsoleSink<W = Stdout> {
    element: String,
    out: W,
}

impl ConsoleSink<Stdout> {
    pub fn stdout(element: impl Into<String>) -> Self {
        Self::new(element, io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(element: impl Into<String>, out: W) -> Self {
        Self {
            element: element.into(),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StyleSink for ConsoleSink<W> {
    fn set(&mut self, property: &str, value: &str) -> Result<(), SinkError> {
        writeln!(self.out, "{}.style.{} = {}", self.element, property, value)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_one_line_per_write() {
        let mut sink = ConsoleSink::new("#logo", Vec::new());
        sink.set("top", "12px").unwrap();
        sink.set("top", "13px").unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "#logo.style.top = 12px\n#logo.style.top = 13px\n");
    }
}
