use std::path::Path;

pub async fn read_file_lines(path: impl AsRef<Path>) -> eyre::Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(non_empty_lines(&contents))
}

fn non_empty_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
