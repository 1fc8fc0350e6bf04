use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TailError;
use crate::filter::FilterSet;

/// Every included line of `path`, in file order.
pub fn read_lines(path: &Path, filters: &FilterSet) -> Result<Vec<String>, TailError> {
    let mut lines = Vec::new();
    for_each_line(path, filters, |line| lines.push(line))?;
    Ok(lines)
}

/// The last `n` included lines of `path`, in file order. Reads the whole file;
/// `n <= 0` returns every included line.
pub fn tail_lines_forward(path: &Path, n: i64, filters: &FilterSet) -> Result<Vec<String>, TailError> {
    let Some(limit) = crate::tail::line_limit(n) else {
        return read_lines(path, filters);
    };
    let mut window = VecDeque::with_capacity(limit.min(1024));
    for_each_line(path, filters, |line| {
        if window.len() == limit {
            window.pop_front();
        }
        window.push_back(line);
    })?;
    Ok(window.into())
}

fn for_each_line<F>(path: &Path, filters: &FilterSet, mut f: F) -> Result<(), TailError>
where
    F: FnMut(String),
{
    let file = File::open(path).map_err(|err| TailError::from_open(path, err))?;
    let mut reader = BufReader::new(file);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&raw);
        let text = text.trim_end();
        if !text.is_empty() && filters.include(text) {
            f(text.to_string());
        }
    }
}
