use std::pin::Pin;
use std::task::{Context, Poll};

use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use futures_core::Stream;

/// Wraps a [`ByteStream`] so it can be used as a streaming `hyper` body.
pub struct HyperBodyWrapByteStream(ByteStream);

impl HyperBodyWrapByteStream {
    pub fn new(stream: ByteStream) -> Self {
        Self(stream)
    }

    pub fn into_inner(self) -> ByteStream {
        self.0
    }
}

impl Stream for HyperBodyWrapByteStream {
    type Item = Result<Bytes, aws_smithy_types::byte_stream::error::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.0).poll_next(cx)
    }
}

impl From<HyperBodyWrapByteStream> for hyper::Body {
    fn from(stream: HyperBodyWrapByteStream) -> Self {
        hyper::Body::wrap_stream(stream)
    }
}
