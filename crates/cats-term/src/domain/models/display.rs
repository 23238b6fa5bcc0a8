/// Semantic colour of a span. The UI theme maps tones to terminal styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Heading,
    Info,
    Success,
    Warning,
    Error,
    Accent,
    Label,
    Value,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySpan {
    pub text: String,
    pub tone: Tone,
}

/// One rendered row: leading indentation plus styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLine {
    pub indent: usize,
    pub spans: Vec<DisplaySpan>,
}

impl DisplayLine {
    pub fn new(indent: usize) -> DisplayLine {
        return DisplayLine {
            indent,
            spans: vec![],
        };
    }

    pub fn styled(indent: usize, text: &str, tone: Tone) -> DisplayLine {
        return DisplayLine::new(indent).span(text, tone);
    }

    pub fn span(mut self, text: &str, tone: Tone) -> DisplayLine {
        self.spans.push(DisplaySpan {
            text: text.to_string(),
            tone,
        });
        return self;
    }

    /// Unstyled text with trailing whitespace removed.
    pub fn plain_text(&self) -> String {
        let mut out = " ".repeat(self.indent);
        for span in &self.spans {
            out.push_str(&span.text);
        }
        return out.trim_end().to_string();
    }
}

/// An immutable unit of output. Blocks are assembled with the builder
/// methods and never changed once handed to the screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBlock {
    lines: Vec<DisplayLine>,
}

impl DisplayBlock {
    pub fn new() -> DisplayBlock {
        return DisplayBlock::default();
    }

    /// A block holding `text`, one line per `\n`-separated part.
    pub fn text(text: &str, tone: Tone) -> DisplayBlock {
        return DisplayBlock::new().line(text, tone);
    }

    pub fn line(mut self, text: &str, tone: Tone) -> DisplayBlock {
        for part in text.split('\n') {
            self.lines.push(DisplayLine::styled(0, part, tone));
        }
        return self;
    }

    pub fn blank(mut self) -> DisplayBlock {
        self.lines.push(DisplayLine::new(0));
        return self;
    }

    pub fn push(mut self, line: DisplayLine) -> DisplayBlock {
        self.lines.push(line);
        return self;
    }

    pub fn append(mut self, other: DisplayBlock) -> DisplayBlock {
        self.lines.extend(other.lines);
        return self;
    }

    pub fn lines(&self) -> &[DisplayLine] {
        return &self.lines;
    }

    pub fn into_lines(self) -> Vec<DisplayLine> {
        return self.lines;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines.is_empty();
    }

    pub fn plain_text(&self) -> String {
        return self
            .lines
            .iter()
            .map(DisplayLine::plain_text)
            .collect::<Vec<String>>()
            .join("\n");
    }
}

impl From<Vec<DisplayLine>> for DisplayBlock {
    fn from(lines: Vec<DisplayLine>) -> DisplayBlock {
        return DisplayBlock { lines };
    }
}
