use crate::response::GenerateContentResponse;

/// Incremental parser for SSE-framed generation responses.
///
/// Frames arrive as `data: <json>` blocks separated by blank lines and may
/// be split arbitrarily across network chunks; the parser buffers until a
/// complete frame is available.
#[derive(Debug, Default)]
pub struct SseStreamParser {
    buffer: String,
}

impl SseStreamParser {
    /// Feed arbitrary bytes into the parser and drain complete frames.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<GenerateContentResponse> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        let mut responses = Vec::new();

        while let Some(split) = self.buffer.find("\n\n") {
            let frame = self.buffer[..split].to_string();
            self.buffer.drain(0..split + 2);

            if let Some(payload) = extract_data_payload(&frame) {
                if payload.is_empty() {
                    continue;
                }

                if let Ok(response) = serde_json::from_str::<GenerateContentResponse>(&payload) {
                    responses.push(response);
                }
            }
        }

        responses
    }

    /// Parse a complete SSE payload string in one shot.
    pub fn parse_frames(input: &str) -> Vec<GenerateContentResponse> {
        let mut parser = Self::default();
        parser.feed(input.as_bytes())
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}

fn extract_data_payload(frame: &str) -> Option<String> {
    let data_lines: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::SseStreamParser;

    const HELLO_FRAME: &str = "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hello\"}]}}]}\n\n";

    #[test]
    fn parse_sse_frames_incrementally() {
        let mut parser = SseStreamParser::default();
        let mut responses = Vec::new();

        responses.extend(parser.feed(HELLO_FRAME.as_bytes()));
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].text().as_deref(), Some("Hello"));
        assert!(parser.is_empty_buffer());
    }

    #[test]
    fn frames_split_across_chunks_are_buffered() {
        let mut parser = SseStreamParser::default();
        let (head, tail) = HELLO_FRAME.split_at(24);

        assert!(parser.feed(head.as_bytes()).is_empty());
        assert!(!parser.is_empty_buffer());

        let responses = parser.feed(tail.as_bytes());
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].text().as_deref(), Some("Hello"));
    }

    #[test]
    fn multiple_frames_in_one_chunk_drain_in_order() {
        let frames = concat!(
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"A\"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"B\"}]}}]}\n\n",
        );

        let responses = SseStreamParser::parse_frames(frames);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].text().as_deref(), Some("A"));
        assert_eq!(responses[1].text().as_deref(), Some("B"));
    }

    #[test]
    fn non_data_lines_and_malformed_json_are_skipped() {
        let frames = ": keep-alive\n\ndata: not json\n\n";

        assert!(SseStreamParser::parse_frames(frames).is_empty());
    }
}
