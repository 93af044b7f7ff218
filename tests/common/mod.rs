#![allow(dead_code)]

use std::path::PathBuf;

use tokio::io::{AsyncRead, AsyncReadExt};
use vmm_sys_util::tempdir::TempDir;

/// Creates `dir` below `tmp` and returns its path.
pub fn subdir(tmp: &TempDir, dir: &str) -> PathBuf {
    let path = tmp.as_path().join(dir);
    std::fs::create_dir_all(&path).unwrap();
    path
}

/// A response split back into its parts.
#[derive(Debug)]
pub struct ParsedResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ParsedResponse {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_length(&self) -> usize {
        self.header("Content-Length").unwrap().parse().unwrap()
    }
}

/// Parses `raw` as a single response framed by its Content-Length.
pub fn parse_response(raw: &[u8]) -> ParsedResponse {
    let head_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator");

    let mut parsed = parse_head(&raw[..head_end]);
    let body_start = head_end + 4;
    parsed.body = raw[body_start..body_start + parsed.content_length()].to_vec();
    parsed
}

/// Reads exactly one response off `stream`.
pub async fn read_response<R: AsyncRead + Unpin>(stream: &mut R) -> ParsedResponse {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        stream.read_exact(&mut byte).await.unwrap();
        head.push(byte[0]);
    }

    let mut parsed = parse_head(&head[..head.len() - 4]);
    let mut body = vec![0u8; parsed.content_length()];
    stream.read_exact(&mut body).await.unwrap();
    parsed.body = body;
    parsed
}

fn parse_head(head: &[u8]) -> ParsedResponse {
    let head = std::str::from_utf8(head).unwrap();
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap().to_string();
    let headers = lines
        .map(|line| {
            let (k, v) = line.split_once(':').expect("malformed header");
            (k.trim().to_string(), v.trim().to_string())
        })
        .collect();

    ParsedResponse {
        status_line,
        headers,
        body: Vec::new(),
    }
}
