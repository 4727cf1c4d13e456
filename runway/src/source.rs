//! Content source contract.

use futures::future::BoxFuture;

/// Supplies row data and turns it into nodes.
///
/// A source owns its own paging state. `fetch` returns a future that owns
/// everything it needs, so the cursor advances when the fetch is issued and
/// not when it resolves. The controller keeps at most one fetch in flight.
pub trait ContentSource {
    /// One row of data.
    type Row: Send + 'static;

    /// Handle to a visual element.
    type Node;

    /// Fetch roughly `count` more rows. An empty batch means there is
    /// nothing left.
    fn fetch(&mut self, count: usize) -> BoxFuture<'static, Vec<Self::Row>>;

    /// A fresh, unattached skeleton node of representative size.
    fn create_placeholder(&mut self) -> Self::Node;

    /// Render `row`, rewriting `reuse` in place when one is supplied.
    fn render(&mut self, row: &Self::Row, reuse: Option<Self::Node>) -> Self::Node;
}
