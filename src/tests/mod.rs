//! Cross-module tests
//!
//! These exercise the full question/answer flow offline: artifacts written to
//! disk, loaded through the real index loader, retrieved against a scripted
//! embedder, and answered by a scripted generator.
