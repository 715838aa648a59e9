//! Racing asynchronous operations against each other.

use alloc::vec::Vec;

use futures::future::select_all;

/// Waits for the first of several futures to complete.
///
/// Returns the winner's output together with its index in `futures`. Every
/// other future is dropped before this returns, which cancels it: a timer is
/// disarmed, a pending listener is detached. Returns `None` if `futures` is
/// empty.
///
/// When several futures are ready at the same time, the one listed first
/// wins.
///
/// # Example
///
/// ```
/// use futures::future::{self, FutureExt};
/// use taprs::first_of;
///
/// let racers = vec![future::pending::<u8>().boxed(), future::ready(7).boxed()];
/// let winner = futures::executor::block_on(first_of(racers));
/// assert_eq!(winner, Some((7, 1)));
/// ```
pub async fn first_of<I>(futures: I) -> Option<(<I::Item as Future>::Output, usize)>
where
    I: IntoIterator,
    I::Item: Future + Unpin,
{
    let (output, index, losers) = next_of(futures.into_iter().collect()).await?;
    drop(losers);
    Some((output, index))
}

/// Waits for the first of several futures to complete and hands back the
/// ones still running.
///
/// The remaining futures keep their relative order; the winner's slot is
/// gone, so inserting a replacement at the returned index restores the
/// original positions. Returns `None` if `futures` is empty.
///
/// # Example
///
/// ```
/// use futures::future::{self, FutureExt};
/// use taprs::race::next_of;
///
/// let racers = vec![future::pending::<u8>().boxed(), future::ready(7).boxed()];
/// let (output, index, rest) = futures::executor::block_on(next_of(racers)).unwrap();
/// assert_eq!((output, index, rest.len()), (7, 1, 1));
/// ```
pub async fn next_of<F>(futures: Vec<F>) -> Option<(F::Output, usize, Vec<F>)>
where
    F: Future + Unpin,
{
    if futures.is_empty() {
        return None;
    }

    let (output, index, rest) = select_all(futures).await;
    tracing::trace!(winner = index, pending = rest.len(), "race settled");
    Some((output, index, rest))
}
