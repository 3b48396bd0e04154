//! Web server exposing the extracted panel.
//!
//! This module provides the HTTP trigger surface around the extractor.
//! Every panel request re-reads the workbook from disk, so an upload is
//! visible on the next request without any cache invalidation.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 3000
//! antigram-panel serve
//!
//! # Custom port and auto-open browser
//! antigram-panel serve --port 8080 --open
//!
//! # Require a shared secret for uploads
//! antigram-panel serve --upload-token s3cret
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Static panel client
//! - `GET /panel.json` - Extract and return the current panel
//! - `POST /upload` - Replace the source workbook (multipart form)
//! - `GET /_health` - Liveness probe

pub mod server;
