// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Streaming token protocol: readers over text and element trees, writers
//! emitting text or element trees.

pub mod decode_reader;
pub mod element_reader;
pub mod element_writer;
pub mod reader;
pub mod token;
pub mod writer;

pub use decode_reader::JsonDecodeReader;
pub use element_reader::JsonElementReader;
pub use element_writer::JsonElementWriter;
pub use reader::{JsonNumber, JsonReadable, NodeReader, ReadNode};
pub use token::JsonToken;
pub use writer::{JsonTextWriter, JsonWritable};
