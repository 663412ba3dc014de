//! Incremental `text/event-stream` decoder.
//!
//! Feed it body chunks as they arrive; it returns every message completed by
//! a blank line. Lines may end in `\n`, `\r\n` or `\r`, and a chunk boundary
//! may fall anywhere, including between `\r` and `\n`.

/// One dispatched SSE message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    /// `data:` lines joined with `\n`.
    pub data: String,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    /// Last byte consumed was `\r`; a following `\n` belongs to the same line end.
    after_cr: bool,
    data: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        let mut out = Vec::new();
        for &b in chunk {
            if self.after_cr {
                self.after_cr = false;
                if b == b'\n' {
                    continue;
                }
            }
            match b {
                b'\n' => self.end_line(&mut out),
                b'\r' => {
                    self.after_cr = true;
                    self.end_line(&mut out);
                }
                _ => self.line.push(b),
            }
        }
        out
    }

    fn end_line(&mut self, out: &mut Vec<SseMessage>) {
        let line = std::mem::take(&mut self.line);
        if line.is_empty() {
            if let Some(msg) = self.dispatch() {
                out.push(msg);
            }
            return;
        }
        let line = String::from_utf8_lossy(&line);
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line.as_ref(), ""),
        };
        match field {
            "data" => match &mut self.data {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.data = Some(value.to_string()),
            },
            // event / id / retry are not used by droppa streams.
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseMessage> {
        let data = self.data.take()?;
        Some(SseMessage { data })
    }
}
