// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};

use azfile_core::Result;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::constants::MAX_RANGE_SIZE;
use crate::range::FileRange;

/// Source of the bytes written by an upload.
pub enum Content {
    /// Bytes already in memory.
    Bytes(Bytes),
    /// A stream read until EOF.
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl Debug for Content {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Bytes(bs) => f.debug_tuple("Content::Bytes").field(&bs.len()).finish(),
            Content::Stream(_) => f.write_str("Content::Stream"),
        }
    }
}

impl Content {
    /// Wrap a reader.
    pub fn from_reader(r: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Content::Stream(Box::new(r))
    }
}

impl From<Bytes> for Content {
    fn from(bs: Bytes) -> Self {
        Content::Bytes(bs)
    }
}

impl From<Vec<u8>> for Content {
    fn from(bs: Vec<u8>) -> Self {
        Content::Bytes(Bytes::from(bs))
    }
}

impl From<&'static [u8]> for Content {
    fn from(bs: &'static [u8]) -> Self {
        Content::Bytes(Bytes::from_static(bs))
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Bytes(Bytes::from(s))
    }
}

impl From<tokio::fs::File> for Content {
    fn from(f: tokio::fs::File) -> Self {
        Content::Stream(Box::new(f))
    }
}

/// Splits a [`Content`] into consecutive ranges of at most [`MAX_RANGE_SIZE`]
/// bytes.
///
/// Every source yields at least one chunk: an empty source yields a single
/// empty one. A stream is only read when the next chunk is asked for, so at
/// most one chunk is held in memory.
pub struct Chunker {
    content: Content,
    chunk_size: usize,
    offset: u64,
    done: bool,
}

impl Chunker {
    /// Create a chunker over `content`.
    pub fn new(content: Content) -> Self {
        Self::with_chunk_size(content, MAX_RANGE_SIZE)
    }

    fn with_chunk_size(content: Content, chunk_size: usize) -> Self {
        Self {
            content,
            chunk_size,
            offset: 0,
            done: false,
        }
    }

    /// Bytes handed out so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Next range and its payload, or `None` once the content is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<(FileRange, Bytes)>> {
        if self.done {
            return Ok(None);
        }

        let chunk = match &mut self.content {
            Content::Bytes(remaining) => {
                if remaining.len() <= self.chunk_size {
                    self.done = true;
                    std::mem::take(remaining)
                } else {
                    remaining.split_to(self.chunk_size)
                }
            }
            Content::Stream(r) => {
                let mut buf = Vec::with_capacity(self.chunk_size);
                r.take(self.chunk_size as u64).read_to_end(&mut buf).await?;

                if buf.len() < self.chunk_size {
                    self.done = true;
                }
                // The previous chunk ended exactly at EOF.
                if buf.is_empty() && self.offset > 0 {
                    return Ok(None);
                }
                Bytes::from(buf)
            }
        };

        let range = FileRange::with_length(self.offset, chunk.len() as u64);
        self.offset += range.len();
        Ok(Some((range, chunk)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ranges(mut chunker: Chunker) -> Vec<(u64, Option<u64>, usize)> {
        let mut out = Vec::new();
        while let Some((range, body)) = chunker.next_chunk().await.unwrap() {
            out.push((range.start(), range.end(), body.len()));
        }
        out
    }

    #[tokio::test]
    async fn test_bytes() {
        let cases = vec![
            ("empty", 0, vec![(0, None, 0)]),
            ("short", 3, vec![(0, Some(2), 3)]),
            ("exact", 8, vec![(0, Some(3), 4), (4, Some(7), 4)]),
            (
                "uneven",
                10,
                vec![(0, Some(3), 4), (4, Some(7), 4), (8, Some(9), 2)],
            ),
        ];

        for (name, size, expected) in cases {
            let chunker = Chunker::with_chunk_size(Content::from(vec![7u8; size]), 4);
            assert_eq!(ranges(chunker).await, expected, "Failed for case: {name}");
        }
    }

    #[tokio::test]
    async fn test_stream() {
        let cases = vec![
            ("empty", 0, vec![(0, None, 0)]),
            ("short", 3, vec![(0, Some(2), 3)]),
            ("exact", 8, vec![(0, Some(3), 4), (4, Some(7), 4)]),
            (
                "uneven",
                10,
                vec![(0, Some(3), 4), (4, Some(7), 4), (8, Some(9), 2)],
            ),
        ];

        for (name, size, expected) in cases {
            let reader = std::io::Cursor::new(vec![7u8; size]);
            let chunker = Chunker::with_chunk_size(Content::from_reader(reader), 4);
            assert_eq!(ranges(chunker).await, expected, "Failed for case: {name}");
        }
    }

    #[tokio::test]
    async fn test_default_chunk_size() {
        let chunker = Chunker::new(Content::from(vec![0u8; 10 * 1024 * 1024]));

        assert_eq!(
            ranges(chunker).await,
            vec![
                (0, Some(4194303), 4194304),
                (4194304, Some(8388607), 4194304),
                (8388608, Some(10485759), 2097152),
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_payload_is_in_order() {
        let data: Vec<u8> = (0..10u8).collect();
        let mut chunker =
            Chunker::with_chunk_size(Content::from_reader(std::io::Cursor::new(data)), 4);

        let mut joined = Vec::new();
        while let Some((_, body)) = chunker.next_chunk().await.unwrap() {
            joined.extend_from_slice(&body);
        }
        assert_eq!(joined, (0..10u8).collect::<Vec<_>>());
        assert_eq!(chunker.offset(), 10);
    }
}
