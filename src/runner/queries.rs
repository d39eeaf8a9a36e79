use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const STDIN_SENTINEL: &str = "-";

/// Turns the positional CLI input into a list of queries, reading stdin when
/// the input is `-`.
pub async fn resolve_queries(input: &str) -> Result<Vec<String>> {
    resolve_queries_from(input, BufReader::new(tokio::io::stdin())).await
}

/// `-` reads non-blank lines from `reader`. An existing path yields every line
/// of that file, blank ones included. Anything else is a single literal query.
pub async fn resolve_queries_from<R>(input: &str, reader: R) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    if input == STDIN_SENTINEL {
        let mut lines = reader.lines();
        let mut queries = Vec::new();
        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read queries from stdin")?
        {
            let line = line.trim();
            if !line.is_empty() {
                queries.push(line.to_string());
            }
        }
        return Ok(queries);
    }

    if tokio::fs::try_exists(input).await.unwrap_or(false) {
        let contents = tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read queries from {}", input))?;
        return Ok(contents
            .lines()
            .map(|line| line.trim().to_string())
            .collect());
    }

    Ok(vec![input.to_string()])
}
