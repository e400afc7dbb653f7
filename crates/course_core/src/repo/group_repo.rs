//! Group repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist capacity-bounded groups.
//! - Answer occupancy questions for the enrollment service.
//!
//! # Invariants
//! - Write paths call `NewGroup::validate()` before SQL mutations.
//! - Occupancy counts only students with `is_deleted = 0`.

use crate::model::group::{Group, GroupId, NewGroup};
use crate::model::EntityKind;
use crate::repo::schema::{bool_to_int, ensure_table_ready, parse_flag};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const GROUP_SELECT_SQL: &str = "SELECT
    id,
    group_no,
    student_limit,
    is_deleted
FROM student_groups";

const GROUP_COLUMNS: &[&str] = &["id", "group_no", "student_limit", "is_deleted", "updated_at"];

/// Repository interface for group persistence.
pub trait GroupRepository {
    fn insert_group(&self, group: &NewGroup) -> RepoResult<GroupId>;
    fn get_group(&self, id: GroupId, include_deleted: bool) -> RepoResult<Option<Group>>;
    /// Lists groups ordered by id.
    fn list_groups(&self, include_deleted: bool) -> RepoResult<Vec<Group>>;
    /// Counts students with `is_deleted = 0` referencing the group.
    fn count_active_members(&self, id: GroupId) -> RepoResult<u32>;
    fn soft_delete_group(&self, id: GroupId) -> RepoResult<()>;
}

/// SQLite-backed group repository.
pub struct SqliteGroupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "student_groups", GROUP_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn insert_group(&self, group: &NewGroup) -> RepoResult<GroupId> {
        group.validate()?;

        self.conn.execute(
            "INSERT INTO student_groups (group_no, student_limit, is_deleted) VALUES (?1, ?2, 0);",
            params![group.no.as_str(), group.limit],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_group(&self, id: GroupId, include_deleted: bool) -> RepoResult<Option<Group>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GROUP_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id, bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_group_row(row)?));
        }

        Ok(None)
    }

    fn list_groups(&self, include_deleted: bool) -> RepoResult<Vec<Group>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GROUP_SELECT_SQL}
             WHERE ?1 = 1 OR is_deleted = 0
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([bool_to_int(include_deleted)])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(parse_group_row(row)?);
        }

        Ok(groups)
    }

    fn count_active_members(&self, id: GroupId) -> RepoResult<u32> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM students
             WHERE group_id = ?1
               AND is_deleted = 0;",
            [id],
            |row| row.get(0),
        )?;

        u32::try_from(count).map_err(|_| {
            RepoError::InvalidData(format!("member count `{count}` out of range for group {id}"))
        })
    }

    fn soft_delete_group(&self, id: GroupId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE student_groups
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND is_deleted = 0;",
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Group,
                id,
            });
        }

        Ok(())
    }
}

fn parse_group_row(row: &Row<'_>) -> RepoResult<Group> {
    let id: GroupId = row.get("id")?;

    let raw_limit: i64 = row.get("student_limit")?;
    let limit = u32::try_from(raw_limit).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid limit `{raw_limit}` in student_groups.student_limit for group {id}"
        ))
    })?;

    let group = Group {
        id,
        no: row.get("group_no")?,
        limit,
        is_deleted: parse_flag(row.get("is_deleted")?, "student_groups.is_deleted")?,
    };
    group
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("group {id}: {err}")))?;
    Ok(group)
}
