//! Many point files through a fixed-size rayon pool.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use log::{debug, warn};
use point_grid::GridFinder;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::point_file::read_points;

/// One file to process. Workers only ever read these.
#[derive(Clone, Debug)]
pub struct BatchTask {
    pub index: usize,
    pub path: PathBuf,
}

impl BatchTask {
    pub fn from_paths(paths: &[PathBuf]) -> Vec<Self> {
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| Self {
                index,
                path: path.clone(),
            })
            .collect()
    }
}

/// All output lines of one task, ready to be written in one go.
pub fn render_task(task: &BatchTask, finder: &GridFinder) -> String {
    let name = task.path.display();
    let mut out = String::new();

    let points = match read_points(&task.path) {
        Ok(points) => points,
        Err(err) => {
            warn!("{name}: {err}");
            let _ = writeln!(out, "## couldn't open '{name}'");
            let _ = writeln!(out, "{name} - -");
            return out;
        }
    };

    match finder.detect(&points) {
        Ok(detection) => {
            debug!("task {}: grid found in {name}", task.index);
            for p in &detection.points {
                let _ = writeln!(out, "{name} {:.6} {:.6}", p.x, p.y);
            }
        }
        Err(err) => {
            debug!("task {}: {name}: {err}", task.index);
            let _ = writeln!(out, "{name} - -");
        }
    }
    out
}

fn lock_poisoned() -> io::Error {
    io::Error::other("batch output lock poisoned")
}

fn write_record<W: Write>(sink: &Mutex<W>, record: &str) -> io::Result<()> {
    let mut out = sink.lock().map_err(|_| lock_poisoned())?;
    out.write_all(record.as_bytes())
}

/// Process `paths` on a pool of `jobs` threads and write the combined report to `out`.
///
/// Each file's records are contiguous; with more than one worker the files
/// may appear in any order.
pub fn run_batch<W: Write + Send>(
    paths: &[PathBuf],
    jobs: usize,
    finder: &GridFinder,
    mut out: W,
) -> io::Result<W> {
    writeln!(out, "# filename x y")?;

    let tasks = BatchTask::from_paths(paths);
    let jobs = jobs.clamp(1, tasks.len().max(1));
    debug!("processing {} files with {jobs} workers", tasks.len());

    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(io::Error::other)?;
    let sink = Mutex::new(out);

    pool.install(|| {
        tasks
            .par_iter()
            .try_for_each(|task| write_record(&sink, &render_task(task, finder)))
    })?;

    let mut out = sink.into_inner().map_err(|_| lock_poisoned())?;
    out.flush()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use point_grid::GRID_N;
    use std::fs;
    use tempfile::TempDir;

    fn lattice_text(spacing: f64) -> String {
        let mut text = String::from("# x y\n");
        for v in 0..GRID_N {
            for u in 0..GRID_N {
                text.push_str(&format!("{} {}\n", u as f64 * spacing, v as f64 * spacing));
            }
        }
        text
    }

    fn write_file(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn single_worker_keeps_file_order() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.txt", &lattice_text(12.0));
        let bad = write_file(&dir, "bad.txt", "1 2\n3 4\n");
        let missing = dir.path().join("missing.txt");

        let out = run_batch(
            &[bad.clone(), missing.clone(), good.clone()],
            1,
            &GridFinder::default(),
            Vec::new(),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# filename x y");
        assert_eq!(lines[1], format!("{} - -", bad.display()));
        assert_eq!(lines[2], format!("## couldn't open '{}'", missing.display()));
        assert_eq!(lines[3], format!("{} - -", missing.display()));
        assert_eq!(lines[4], format!("{} 0.000000 0.000000", good.display()));
        assert_eq!(lines[5], format!("{} 12.000000 0.000000", good.display()));
        assert_eq!(lines.len(), 4 + GRID_N * GRID_N);
    }

    #[test]
    fn parallel_workers_keep_records_contiguous() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..6)
            .map(|k| write_file(&dir, &format!("grid{k}.txt"), &lattice_text(5.0 + k as f64)))
            .collect();

        let out = run_batch(&paths, 3, &GridFinder::default(), Vec::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let records: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(records.len(), paths.len() * GRID_N * GRID_N);

        for chunk in records.chunks(GRID_N * GRID_N) {
            let name = chunk[0].split(' ').next().unwrap();
            assert!(chunk.iter().all(|line| line.split(' ').next() == Some(name)));
        }
    }

    #[test]
    fn zero_jobs_fall_back_to_one_worker() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "grid.txt", &lattice_text(9.0));

        let out = run_batch(&[path.clone()], 0, &GridFinder::default(), Vec::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1 + GRID_N * GRID_N);
        assert!(text.lines().skip(1).all(|l| l.starts_with(&format!("{} ", path.display()))));
    }

    #[test]
    fn tasks_are_indexed_in_input_order() {
        let tasks = BatchTask::from_paths(&[PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(tasks[1].index, 1);
        assert_eq!(tasks[1].path, PathBuf::from("b"));
    }
}
