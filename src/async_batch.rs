//! Async batch processing module
//!
//! Validating or decoding many addresses is embarrassingly parallel: the ROM
//! buffer is read-only and every decode is a pure function of its inputs.
//! This module spreads that work over blocking worker threads with a bounded
//! number in flight. Results always come back in input order and are
//! identical to the sequential functions.

#[cfg(feature = "async")]
/// Concurrent validation and decoding over one shared ROM buffer
pub mod processor {
    use crate::codec::Codec;
    use crate::decode::{decode_image, DecodeResult};
    use crate::scan::{is_candidate, PointerSet};
    use crate::source::ByteSource;
    use crate::GbaViewError;
    use futures::stream::{self, StreamExt};
    use std::sync::Arc;

    /// One plain image decode
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ImageRequest {
        /// Image address
        pub image: u32,
        /// Palette address
        pub palette: u32,
        /// Raw span used when the image is not compressed
        pub fallback_len: Option<usize>,
        /// Tiles per row
        pub width: u32,
    }

    /// Concurrent decoder with a configurable concurrency limit
    #[derive(Debug, Clone)]
    pub struct AsyncBatchDecoder {
        concurrency_limit: usize,
    }

    impl AsyncBatchDecoder {
        /// Create a batch decoder using one task per CPU
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
            }
        }

        /// Set the concurrency limit (at least one)
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Current concurrency limit
        pub fn concurrency(&self) -> usize {
            self.concurrency_limit
        }

        /// Run the strict header check on every offset
        pub async fn validate_all(
            &self,
            source: &ByteSource,
            offsets: Vec<u32>,
        ) -> Vec<(u32, bool)> {
            stream::iter(offsets.into_iter().map(|offset| {
                let source = source.clone();
                async move {
                    let valid =
                        tokio::task::spawn_blocking(move || is_candidate(&source, offset, true))
                            .await
                            .unwrap_or(false);
                    (offset, valid)
                }
            }))
            .buffered(self.concurrency_limit)
            .collect()
            .await
        }

        /// Keep only the pointers that decompress cleanly
        pub async fn confirm_candidates(
            &self,
            source: &ByteSource,
            pointers: &PointerSet,
        ) -> PointerSet {
            let checked = self.validate_all(source, pointers.iter().collect()).await;
            PointerSet::from_addresses(
                checked
                    .into_iter()
                    .filter_map(|(offset, valid)| valid.then_some(offset)),
            )
        }

        /// Decode every request with the same codec
        pub async fn decode_images<C>(
            &self,
            source: &ByteSource,
            codec: Arc<C>,
            requests: Vec<ImageRequest>,
        ) -> Vec<(ImageRequest, DecodeResult)>
        where
            C: Codec + Send + Sync + 'static,
        {
            stream::iter(requests.into_iter().map(|request| {
                let source = source.clone();
                let codec = Arc::clone(&codec);
                async move {
                    let result = tokio::task::spawn_blocking(move || {
                        decode_image(
                            &source,
                            codec.as_ref(),
                            request.image,
                            request.palette,
                            request.fallback_len,
                            request.width,
                        )
                    })
                    .await
                    .map_err(|e| GbaViewError::from(std::io::Error::from(e)))
                    .and_then(|result| result);
                    (request, result)
                }
            }))
            .buffered(self.concurrency_limit)
            .collect()
            .await
        }
    }

    impl Default for AsyncBatchDecoder {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "async")]
pub use processor::{AsyncBatchDecoder, ImageRequest};
