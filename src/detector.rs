//! Landmark sources for the real application.
//!
//! * [`SubprocessDetector`] runs an external hand-landmark model (for example a
//!   MediaPipe script) as a child process. Per frame we write a small header plus
//!   raw RGB bytes to its stdin and read back one JSON line.
//! * [`PointerSimulator`] stands in for a hand when no detector is configured:
//!   the mouse is the index tip and holding the left button pinches.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::landmarks::{mediapipe, LandmarkSnapshot, LandmarkSource};
use crate::types::FrameBuffer;

/// Detections scoring below this are ignored.
pub const DEFAULT_MIN_SCORE: f32 = 0.5;

// ---------------------------- wire format -----------------------------------

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    #[allow(dead_code)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one detector reply. The best-scoring complete hand at or above
/// `min_score` wins; a reply carrying an `error` means no hand this frame.
pub fn parse_detection(line: &str, min_score: f32) -> Result<LandmarkSnapshot> {
    let reply: DetectionJson = serde_json::from_str(line.trim())
        .map_err(|e| Error::Detector(format!("bad reply {:?}: {e}", line.trim())))?;

    if let Some(err) = reply.error {
        warn!(error = %err, "detector reported an error");
        return Ok(LandmarkSnapshot::empty());
    }

    let best = reply
        .hands
        .iter()
        .filter(|h| h.score >= min_score)
        .filter(|h| {
            let complete = h.landmarks.len() == mediapipe::POINT_COUNT;
            if !complete {
                warn!(got = h.landmarks.len(), "expected 21 landmarks, skipping hand");
            }
            complete
        })
        .max_by(|a, b| a.score.total_cmp(&b.score));

    let Some(hand) = best else {
        return Ok(LandmarkSnapshot::empty());
    };
    debug!(handedness = %hand.handedness, score = hand.score, "hand detected");
    let points: Vec<[f32; 2]> = hand.landmarks.iter().map(|l| [l.x, l.y]).collect();
    Ok(LandmarkSnapshot::from_mediapipe(&points))
}

/// Header (width, height, channels as little-endian u32) followed by RGB bytes.
pub fn encode_frame(frame: &FrameBuffer, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(12 + frame.pixels.len() * 3);
    out.extend_from_slice(&(frame.width as u32).to_le_bytes());
    out.extend_from_slice(&(frame.height as u32).to_le_bytes());
    out.extend_from_slice(&3u32.to_le_bytes());
    for &px in &frame.pixels {
        out.push(((px >> 16) & 0xFF) as u8);
        out.push(((px >> 8) & 0xFF) as u8);
        out.push((px & 0xFF) as u8);
    }
}

// ---------------------------- frame/reply link -------------------------------

/// One request/reply exchange per frame over any writer/reader pair.
pub struct DetectorLink<W: Write, R: BufRead> {
    writer: W,
    reader: R,
    min_score: f32,
    scratch: Vec<u8>,
    line: String,
}

impl<W: Write, R: BufRead> DetectorLink<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        Self { writer, reader, min_score: DEFAULT_MIN_SCORE, scratch: Vec::new(), line: String::new() }
    }

    pub fn set_min_score(&mut self, score: f32) {
        self.min_score = score.clamp(0.0, 1.0);
    }
}

impl<W: Write, R: BufRead> LandmarkSource for DetectorLink<W, R> {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<LandmarkSnapshot> {
        encode_frame(frame, &mut self.scratch);
        self.writer
            .write_all(&self.scratch)
            .and_then(|_| self.writer.flush())
            .map_err(|e| Error::Detector(format!("send frame: {e}")))?;

        self.line.clear();
        let n = self
            .reader
            .read_line(&mut self.line)
            .map_err(|e| Error::Detector(format!("read reply: {e}")))?;
        if n == 0 {
            return Err(Error::Detector("detector closed its output".into()));
        }

        // A garbled reply costs one frame, not the session.
        match parse_detection(&self.line, self.min_score) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!(error = %e, "ignoring detector reply");
                Ok(LandmarkSnapshot::empty())
            }
        }
    }
}

// ---------------------------- child process ----------------------------------

pub struct SubprocessDetector {
    child: Child,
    link: DetectorLink<ChildStdin, BufReader<ChildStdout>>,
}

impl SubprocessDetector {
    /// Start `command_line` (program followed by whitespace-separated arguments)
    /// and wait for it to print `READY`.
    pub fn spawn(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Detector("empty detector command".into()))?;

        info!(command = command_line, "starting landmark detector");
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Detector(format!("spawn {program}: {e}")))?;

        let stdin = child.stdin.take().ok_or_else(|| Error::Detector("no stdin".into()))?;
        let stdout = child.stdout.take().ok_or_else(|| Error::Detector("no stdout".into()))?;
        let mut reader = BufReader::new(stdout);

        let mut ready = String::new();
        reader
            .read_line(&mut ready)
            .map_err(|e| Error::Detector(format!("wait for READY: {e}")))?;
        if ready.trim() != "READY" {
            let _ = child.kill();
            return Err(Error::Detector(format!("expected READY, got {:?}", ready.trim())));
        }
        info!("landmark detector ready");

        Ok(Self { child, link: DetectorLink::new(stdin, reader) })
    }

    pub fn set_min_score(&mut self, score: f32) {
        self.link.set_min_score(score);
    }
}

impl LandmarkSource for SubprocessDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<LandmarkSnapshot> {
        self.link.detect(frame)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

// ---------------------------- pointer stand-in ---------------------------------

/// Mouse-driven hand. Reports pixel coordinates; no mirroring.
pub struct PointerSimulator {
    pointer: Option<(f32, f32)>,
    pressed: bool,
    /// Where the thumb sits relative to the index tip while not pinching.
    open_offset: f32,
}

impl Default for PointerSimulator {
    fn default() -> Self {
        Self { pointer: None, pressed: false, open_offset: 100.0 }
    }
}

impl PointerSimulator {
    /// Latest pointer position in canvas pixels (`None` = outside the canvas).
    pub fn set(&mut self, pointer: Option<(f32, f32)>, pressed: bool) {
        self.pointer = pointer;
        self.pressed = pressed;
    }

    pub fn snapshot(&self) -> LandmarkSnapshot {
        match self.pointer {
            None => LandmarkSnapshot::empty(),
            Some((x, y)) if self.pressed => LandmarkSnapshot::from_tips((x, y), (x, y)),
            Some((x, y)) => LandmarkSnapshot::from_tips((x, y), (x, y + self.open_offset)),
        }
    }
}

impl LandmarkSource for PointerSimulator {
    fn detect(&mut self, _frame: &FrameBuffer) -> Result<LandmarkSnapshot> {
        Ok(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;
    use std::io::Cursor;

    fn hand_json(score: f32, count: usize, index_x: f32) -> String {
        let pts: Vec<String> = (0..count)
            .map(|i| {
                let x = if i == mediapipe::INDEX_FINGER_TIP { index_x } else { 0.1 };
                format!(r#"{{"x":{x},"y":0.5,"z":0.0}}"#)
            })
            .collect();
        format!(r#"{{"handedness":"Right","score":{score},"landmarks":[{}]}}"#, pts.join(","))
    }

    #[test]
    fn best_hand_wins() {
        let line = format!(
            r#"{{"hands":[{},{}]}}"#,
            hand_json(0.6, 21, 0.3),
            hand_json(0.9, 21, 0.7)
        );
        let s = parse_detection(&line, 0.5).unwrap();
        assert_eq!(s.get(Landmark::IndexTip), Some([0.7, 0.5]));
    }

    #[test]
    fn low_confidence_and_incomplete_hands_are_skipped() {
        let line = format!(
            r#"{{"hands":[{},{}]}}"#,
            hand_json(0.3, 21, 0.3),
            hand_json(0.9, 12, 0.7)
        );
        assert!(parse_detection(&line, 0.5).unwrap().is_empty());
    }

    #[test]
    fn error_reply_means_no_hand() {
        let s = parse_detection(r#"{"hands":[],"error":"model crashed"}"#, 0.5).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn empty_reply_means_no_hand() {
        assert!(parse_detection(r#"{"hands":[]}"#, 0.5).unwrap().is_empty());
        assert!(parse_detection("{}\n", 0.5).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(parse_detection("not json", 0.5), Err(Error::Detector(_))));
    }

    #[test]
    fn frame_encoding_has_header_then_rgb() {
        let frame = FrameBuffer { width: 2, height: 1, pixels: vec![0x00_11_22_33, 0x00_AA_BB_CC] };
        let mut out = Vec::new();
        encode_frame(&frame, &mut out);
        assert_eq!(&out[0..4], &2u32.to_le_bytes());
        assert_eq!(&out[4..8], &1u32.to_le_bytes());
        assert_eq!(&out[8..12], &3u32.to_le_bytes());
        assert_eq!(&out[12..], &[0x11, 0x22, 0x33, 0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn link_sends_frame_and_reads_one_reply() {
        let replies = format!("{}\n{}\n", format!(r#"{{"hands":[{}]}}"#, hand_json(0.8, 21, 0.4)), "garbage");
        let mut link = DetectorLink::new(Vec::new(), Cursor::new(replies.into_bytes()));
        let frame = FrameBuffer::new(2, 2, 0);

        let first = link.detect(&frame).unwrap();
        assert_eq!(first.get(Landmark::IndexTip), Some([0.4, 0.5]));
        // 12 byte header + 4 pixels * 3 bytes.
        assert_eq!(link.writer.len(), 12 + 12);

        // Garbled line: no hand, session continues.
        assert!(link.detect(&frame).unwrap().is_empty());
        // Output closed: that is fatal.
        assert!(matches!(link.detect(&frame), Err(Error::Detector(_))));
    }

    #[test]
    fn pointer_pinches_while_pressed() {
        let mut p = PointerSimulator::default();
        p.set(Some((50.0, 60.0)), true);
        let s = p.snapshot();
        assert_eq!(s.get(Landmark::IndexTip), s.get(Landmark::ThumbTip));

        p.set(Some((50.0, 60.0)), false);
        assert_eq!(p.snapshot().get(Landmark::ThumbTip), Some([50.0, 160.0]));

        p.set(None, true);
        assert!(p.snapshot().is_empty());
    }
}
