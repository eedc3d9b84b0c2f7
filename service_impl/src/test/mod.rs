#[cfg(test)]
mod daily_summary;
