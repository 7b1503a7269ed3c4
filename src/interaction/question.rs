//! Reading the user's question.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::base::types::UserQuery;

/// Read one line from `reader` as the question.
///
/// Returns `Ok(None)` at end of input or when the line is blank. Unreadable
/// input (for example, invalid UTF-8) is an error.
pub async fn read_question<R>(reader: R) -> std::io::Result<Option<UserQuery>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    Ok(lines.next_line().await?.filter(|line| !line.trim().is_empty()).map(UserQuery::new))
}
