//! Lazy page stream
//!
//! [`PageStream`] requests one page per `poll_next` and never finishes on
//! its own. Stop consuming it (`take`, `take_while`, a `break`) to end
//! pagination. An exhausted request is yielded once as `Err` and the
//! stream is fused afterwards.

use super::types::{PageCursor, PaginationConfig};
use crate::error::Result;
use crate::http::{ApiClient, RequestSpec};
use crate::types::JsonValue;
use futures::stream::{FusedStream, Stream};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Type alias for the boxed in-flight page request
type PageFuture = Pin<Box<dyn Future<Output = Result<JsonValue>> + Send>>;

/// An unbounded stream of pages fetched at increasing offsets
///
/// # Example
///
/// ```no_run
/// use futures::StreamExt;
/// use gettr_client::{ApiClient, PaginationConfig, RequestSpec};
///
/// # async fn example() -> gettr_client::Result<()> {
/// let client = ApiClient::new()?;
/// let pages = client.paginate(
///     RequestSpec::new("/u/user/jack/posts").param("max", 20),
///     PaginationConfig::default(),
/// )?;
///
/// // The stream is infinite; bound it.
/// let mut pages = pages.take(5);
/// while let Some(page) = pages.next().await {
///     println!("{}", page?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PageStream {
    client: ApiClient,
    request: RequestSpec,
    pagination: PaginationConfig,
    cursor: PageCursor,
    pending: Option<PageFuture>,
    done: bool,
}

impl PageStream {
    pub(crate) fn new(client: ApiClient, request: RequestSpec, pagination: PaginationConfig) -> Self {
        Self {
            client,
            request,
            cursor: pagination.cursor(),
            pagination,
            pending: None,
            done: false,
        }
    }

    /// Offset the next page will be requested at
    pub fn cursor(&self) -> i64 {
        self.cursor.current()
    }

    /// The request every page is derived from
    pub fn request(&self) -> &RequestSpec {
        &self.request
    }

    fn start_request(&self) -> PageFuture {
        let spec = self
            .pagination
            .page_request(&self.request, self.cursor.current());
        let client = self.client.clone();
        Box::pin(async move { client.execute(&spec).await })
    }
}

impl Stream for PageStream {
    type Item = Result<JsonValue>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if this.done {
            return Poll::Ready(None);
        }

        if this.pending.is_none() {
            this.pending = Some(this.start_request());
        }

        let Some(fut) = this.pending.as_mut() else {
            return Poll::Ready(None);
        };

        match fut.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(result) => {
                this.pending = None;
                match result {
                    Ok(page) => {
                        this.cursor.advance();
                        Poll::Ready(Some(Ok(page)))
                    }
                    Err(e) => {
                        this.done = true;
                        Poll::Ready(Some(Err(e)))
                    }
                }
            }
        }
    }
}

impl FusedStream for PageStream {
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl std::fmt::Debug for PageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStream")
            .field("request", &self.request)
            .field("pagination", &self.pagination)
            .field("cursor", &self.cursor)
            .field("in_flight", &self.pending.is_some())
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
