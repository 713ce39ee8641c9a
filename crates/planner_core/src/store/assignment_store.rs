//! Tenant-scoped assignment store over one shared CSV file.
//!
//! # Responsibility
//! - Load one tenant's assignments from the shared file.
//! - Replace one tenant's rows while re-emitting every other row unchanged.
//! - Hand out per-tenant sessions that own their working set.
//!
//! # Invariants
//! - Ownership of a row is decided by its leading field compared with
//!   `TenantId::matches`, never by a string prefix.
//! - Only assignments passing `Assignment::validate()` are added or written.
//! - Saves write a sibling temp file and rename it over the target.
//! - File handles never outlive the call that opened them.
//! - A quoted record never spans a physical line that is a clean row on
//!   its own, so a broken quote cannot absorb other tenants' rows.

use crate::model::assignment::Assignment;
use crate::model::tenant::TenantId;
use crate::store::codec::{self, RecordParseError, HEADER};
use log::{debug, error, info, warn};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failures. Fatal to the operation that hit them.
#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "assignment file `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// One data row of the shared file, decoded or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLine {
    /// 1-based physical line where the record starts.
    pub line_no: usize,
    /// Leading field as stored; the whole row when it has no delimiter.
    pub tenant: String,
    /// Exact stored text, re-emitted verbatim for other tenants.
    pub raw: String,
    pub record: Result<Assignment, RecordParseError>,
}

/// Sort keys for presenting a working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOrder {
    DueDate,
    Lesson,
    /// Open items first.
    Completed,
}

/// Store bound to one shared assignments file.
#[derive(Debug, Clone)]
pub struct AssignmentStore {
    path: PathBuf,
}

impl AssignmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every data row for every tenant.
    ///
    /// A missing file yields an empty list. Rows that fail to decode are
    /// returned with their parse error instead of being dropped.
    pub fn load_all(&self) -> StoreResult<Vec<StoredLine>> {
        let Some(records) = self.read_records()? else {
            return Ok(Vec::new());
        };

        Ok(records
            .into_iter()
            .map(|(line_no, raw)| {
                let (tenant, record) = match codec::split_tenant(&raw) {
                    Some((tenant, rest)) => (tenant.to_string(), codec::decode_assignment(rest)),
                    None => (raw.clone(), Err(RecordParseError::MissingTenant)),
                };
                StoredLine {
                    line_no,
                    tenant,
                    raw,
                    record,
                }
            })
            .collect())
    }

    /// Loads the valid assignments stored for `tenant`, in file order.
    ///
    /// Malformed rows are logged and skipped; invalid records are dropped.
    pub fn load_for_tenant(&self, tenant: &TenantId) -> StoreResult<Vec<Assignment>> {
        let started_at = Instant::now();
        let mut loaded = Vec::new();
        let mut skipped = 0usize;

        for line in self.load_all()? {
            if !tenant.matches(&line.tenant) {
                continue;
            }
            match line.record {
                Ok(assignment) if assignment.is_valid() => loaded.push(assignment),
                Ok(_) => {
                    debug!(
                        "event=assignments_load module=store status=skip line={} reason=invalid_record",
                        line.line_no
                    );
                }
                Err(err) => {
                    skipped += 1;
                    warn!(
                        "event=assignments_load module=store status=skip line={} error={}",
                        line.line_no, err
                    );
                }
            }
        }

        info!(
            "event=assignments_load module=store status=ok loaded={} skipped={} duration_ms={}",
            loaded.len(),
            skipped,
            started_at.elapsed().as_millis()
        );
        Ok(loaded)
    }

    /// Opens a session holding `tenant`'s freshly loaded working set.
    pub fn open_session(&self, tenant: TenantId) -> StoreResult<TenantSession<'_>> {
        let assignments = self.load_for_tenant(&tenant)?;
        Ok(TenantSession {
            store: self,
            tenant,
            assignments,
        })
    }

    /// Replaces every row of `tenant` with the valid subset of `records`.
    ///
    /// Rows of other tenants keep their text and relative order. Returns the
    /// number of rows written for `tenant`.
    ///
    /// # Errors
    /// - [`StoreError::Io`] when the file cannot be read, written or replaced.
    pub fn save_for_tenant(&self, tenant: &TenantId, records: &[Assignment]) -> StoreResult<usize> {
        let started_at = Instant::now();
        let mut lines = vec![HEADER.to_string()];

        if let Some(existing) = self.read_records()? {
            lines.extend(existing.into_iter().filter_map(|(_, raw)| {
                let stored_tenant = codec::split_tenant(&raw).map_or(raw.as_str(), |(t, _)| t);
                (!tenant.matches(stored_tenant)).then_some(raw)
            }));
        }
        let kept = lines.len() - 1;

        let own: Vec<String> = records
            .iter()
            .filter(|assignment| assignment.is_valid())
            .map(|assignment| codec::encode_line(tenant.as_str(), assignment))
            .collect();
        let written = own.len();
        lines.extend(own);

        if let Err(err) = self.replace_file(&lines) {
            error!(
                "event=assignments_save module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }

        info!(
            "event=assignments_save module=store status=ok written={} kept_other={} duration_ms={}",
            written,
            kept,
            started_at.elapsed().as_millis()
        );
        Ok(written)
    }

    /// Reads logical records after the header, with their starting line.
    ///
    /// Quoted notes may span physical lines; those are joined back with the
    /// terminator that separated them. A join is kept only when the joined
    /// text decodes cleanly and no continuation line is a clean row of its
    /// own; otherwise the opening line stands alone and scanning resumes on
    /// the next physical line. Blank lines are ignored. Returns `None` when
    /// the file does not exist.
    fn read_records(&self) -> StoreResult<Option<Vec<(usize, String)>>> {
        let Some(lines) = read_physical_lines(&self.path)
            .map_err(|err| StoreError::io(&self.path, err))?
        else {
            return Ok(None);
        };

        let mut records = Vec::new();
        let mut index = 0;
        while index < lines.len() {
            let line_no = index + 1;
            let content = &lines[index].content;

            if (index == 0 && codec::is_header(content)) || content.trim().is_empty() {
                index += 1;
                continue;
            }
            if codec::continues_on_next_line(content) {
                if let Some((text, next)) = join_quoted(&lines, index) {
                    records.push((line_no, text));
                    index = next;
                    continue;
                }
                debug!(
                    "event=assignments_read module=store status=unjoined line={}",
                    line_no
                );
            }
            records.push((line_no, content.clone()));
            index += 1;
        }

        Ok(Some(records))
    }

    fn replace_file(&self, lines: &[String]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }

        let temp_path = temp_path_for(&self.path);
        let result = write_lines(&temp_path, lines)
            .and_then(|()| fs::rename(&temp_path, &self.path))
            .map_err(|err| StoreError::io(&self.path, err));
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

/// Working set of one tenant, detached from every other tenant's data.
#[derive(Debug)]
pub struct TenantSession<'store> {
    store: &'store AssignmentStore,
    tenant: TenantId,
    assignments: Vec<Assignment>,
}

impl TenantSession<'_> {
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Appends `assignment` when valid. Returns `false` and leaves the
    /// working set untouched otherwise.
    pub fn add(&mut self, assignment: Assignment) -> bool {
        if let Err(err) = assignment.validate() {
            debug!("event=assignment_add module=store status=rejected reason={err}");
            return false;
        }
        self.assignments.push(assignment);
        true
    }

    /// Replaces the first entry equal to `old` with `new`.
    ///
    /// Returns `false` without mutation when `new` is invalid or `old` is
    /// not in the working set.
    pub fn update(&mut self, old: &Assignment, new: Assignment) -> bool {
        if let Err(err) = new.validate() {
            debug!("event=assignment_update module=store status=rejected reason={err}");
            return false;
        }
        match self.assignments.iter().position(|entry| entry == old) {
            Some(index) => {
                self.assignments[index] = new;
                true
            }
            None => false,
        }
    }

    /// Removes the first entry equal to `assignment`, then saves.
    ///
    /// Returns whether an entry was removed. The save happens either way.
    pub fn remove(&mut self, assignment: &Assignment) -> StoreResult<bool> {
        let removed = match self.assignments.iter().position(|entry| entry == assignment) {
            Some(index) => {
                self.assignments.remove(index);
                true
            }
            None => false,
        };
        self.save()?;
        Ok(removed)
    }

    /// Persists the working set as this tenant's complete row set.
    pub fn save(&self) -> StoreResult<usize> {
        self.store.save_for_tenant(&self.tenant, &self.assignments)
    }

    /// Discards unsaved changes and reloads from disk.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.assignments = self.store.load_for_tenant(&self.tenant)?;
        Ok(())
    }

    /// Returns a sorted copy; the working set order is left as is.
    pub fn sorted_by(&self, order: AssignmentOrder) -> Vec<Assignment> {
        let mut sorted = self.assignments.clone();
        sorted.sort_by(|a, b| compare(a, b, order));
        sorted
    }
}

fn compare(a: &Assignment, b: &Assignment, order: AssignmentOrder) -> Ordering {
    match order {
        AssignmentOrder::DueDate => a.due_date.cmp(&b.due_date),
        AssignmentOrder::Lesson => a
            .lesson
            .display_name()
            .cmp(b.lesson.display_name())
            .then(a.due_date.cmp(&b.due_date)),
        AssignmentOrder::Completed => a
            .completed
            .cmp(&b.completed)
            .then(a.due_date.cmp(&b.due_date)),
    }
}

/// One physical line with its terminator split off.
#[derive(Debug)]
struct PhysicalLine {
    content: String,
    /// `"\r\n"`, `"\n"` or empty on an unterminated last line.
    terminator: &'static str,
}

impl PhysicalLine {
    fn from_raw(mut raw: String) -> Self {
        let terminator = if raw.ends_with("\r\n") {
            "\r\n"
        } else if raw.ends_with('\n') {
            "\n"
        } else {
            ""
        };
        raw.truncate(raw.len() - terminator.len());
        Self {
            content: raw,
            terminator,
        }
    }
}

fn read_physical_lines(path: &Path) -> io::Result<Option<Vec<PhysicalLine>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };

    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    loop {
        let mut raw = String::new();
        if reader.read_line(&mut raw)? == 0 {
            break;
        }
        lines.push(PhysicalLine::from_raw(raw));
    }
    Ok(Some(lines))
}

/// Joins the quoted record opened at `lines[start]` with its continuation
/// lines. Returns the record text and the index after its last line.
fn join_quoted(lines: &[PhysicalLine], start: usize) -> Option<(String, usize)> {
    let mut text = lines[start].content.clone();

    for (offset, pair) in lines[start..].windows(2).enumerate() {
        let (previous, line) = (&pair[0], &pair[1]);
        if codec::decode_line(&line.content).is_ok() {
            return None;
        }
        text.push_str(previous.terminator);
        text.push_str(&line.content);
        match codec::decode_line(&text) {
            Err(RecordParseError::UnterminatedQuote) => continue,
            Ok(_) => return Some((text, start + offset + 2)),
            Err(_) => return None,
        }
    }
    None
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()
}
