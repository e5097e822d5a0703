//! Lazy depth-first traversal of a recursively-fetched folder tree
//!
//! One `listfolder` call with the recursive flag brings back the whole
//! subtree; the walk then yields it item by item without further I/O.

use futures::future;
use futures::stream::{self, Stream, StreamExt};
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::error::Result;
use crate::folder::ListFolderOpts;
use crate::types::Metadata;

/// Pre-order iterator over an already-materialized tree.
///
/// An explicit stack instead of recursion; the server imposes no limit on
/// nesting depth.
struct WalkIter {
    stack: Vec<std::vec::IntoIter<Metadata>>,
}

impl WalkIter {
    fn new(children: Vec<Metadata>) -> Self {
        Self {
            stack: vec![children.into_iter()],
        }
    }
}

impl Iterator for WalkIter {
    type Item = Metadata;

    fn next(&mut self) -> Option<Metadata> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(item) => {
                    if item.is_folder && !item.contents.is_empty() {
                        // Descend before the next sibling; the yielded folder
                        // keeps its subtree attached, as the server sent it.
                        self.stack.push(item.contents.clone().into_iter());
                    }
                    return Some(item);
                }
            }
        }
    }
}

fn walk_stream(
    fetch: impl Future<Output = Result<Metadata>>,
) -> impl Stream<Item = Result<Metadata>> {
    stream::once(fetch).flat_map(|fetched| match fetched {
        Ok(folder) => stream::iter(WalkIter::new(folder.contents))
            .map(Ok)
            .left_stream(),
        Err(err) => stream::once(future::ready(Err(err))).right_stream(),
    })
}

impl Client {
    /// Walk every descendant of `folder_id`, depth-first, in server order.
    ///
    /// The stream is finite and owns its fetch: the single recursive
    /// `listfolder` call happens on first poll, and nothing else ever goes to
    /// the network. The starting folder itself is not yielded. If the fetch
    /// fails, the stream yields that one error and ends. Dropping the stream
    /// after any number of items stops all remaining work.
    pub fn walk<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        folder_id: u64,
    ) -> impl Stream<Item = Result<Metadata>> + 'a {
        walk_stream(async move {
            self.list_folder(
                cancel,
                folder_id,
                ListFolderOpts {
                    recursive: true,
                    ..Default::default()
                },
            )
            .await
        })
    }

    /// Same as [`walk`](Client::walk), starting from a path
    pub fn walk_by_path<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        path: &'a str,
    ) -> impl Stream<Item = Result<Metadata>> + 'a {
        walk_stream(async move {
            self.list_folder_by_path(
                cancel,
                path,
                ListFolderOpts {
                    recursive: true,
                    ..Default::default()
                },
            )
            .await
        })
    }
}
