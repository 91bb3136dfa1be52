//! # invoiceguard-forensic
//!
//! Document forensics for uploaded invoices:
//!
//! - [`metadata`]: PDF and image metadata inspection from raw bytes
//!   (producer/creator strings, editing-software detection, incremental
//!   save counting, modify-after-create).
//! - [`image`]: the [`ImageForensics`] capability interface for
//!   pixel-level analysis (error level analysis, font consistency,
//!   quality scoring), with a stub for deployments without an imaging
//!   backend.

pub mod image;
pub mod metadata;

pub use image::{ImageForensics, UnavailableForensics};
pub use metadata::{is_image_file, ByteInspector, MetadataInspector};
