use std::fmt::Write;

/// A column of one of the analytics tables.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub constraints: &'static str,
    pub comment: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct IndexDescriptor {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub columns: &'static [ColumnDescriptor],
    pub indexes: &'static [IndexDescriptor],
}

/// Compiled-in description of the database the model writes queries for.
///
/// This is never introspected from a live connection, so prompt building and
/// validation work the same whether or not the database is reachable.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDescriptor {
    pub tables: &'static [TableDescriptor],
}

const fn col(
    name: &'static str,
    sql_type: &'static str,
    constraints: &'static str,
    comment: Option<&'static str>,
) -> ColumnDescriptor {
    ColumnDescriptor {
        name,
        sql_type,
        constraints,
        comment,
    }
}

const COUNTER: &str = "NOT NULL DEFAULT 0";
const TIMESTAMP: &str = "TIMESTAMP WITH TIME ZONE";

pub const VIDEOS: TableDescriptor = TableDescriptor {
    name: "videos",
    columns: &[
        col("id", "VARCHAR(36)", "PRIMARY KEY", Some("UUID")),
        col("creator_id", "VARCHAR(32)", "NOT NULL", Some("MD5 hash")),
        col("video_created_at", TIMESTAMP, "NOT NULL", None),
        col("views_count", "BIGINT", COUNTER, None),
        col("likes_count", "BIGINT", COUNTER, None),
        col("comments_count", "BIGINT", COUNTER, None),
        col("reports_count", "BIGINT", COUNTER, None),
        col("created_at", TIMESTAMP, "NOT NULL", None),
        col("updated_at", TIMESTAMP, "NOT NULL", None),
    ],
    indexes: &[
        IndexDescriptor {
            name: "idx_videos_creator_id",
            columns: &["creator_id"],
        },
        IndexDescriptor {
            name: "idx_videos_video_created_at",
            columns: &["video_created_at"],
        },
    ],
};

pub const VIDEO_SNAPSHOTS: TableDescriptor = TableDescriptor {
    name: "video_snapshots",
    columns: &[
        col("id", "VARCHAR(32)", "PRIMARY KEY", Some("MD5 hash")),
        col(
            "video_id",
            "VARCHAR(36)",
            "NOT NULL REFERENCES videos(id) ON DELETE CASCADE",
            None,
        ),
        col("views_count", "BIGINT", COUNTER, None),
        col("likes_count", "BIGINT", COUNTER, None),
        col("comments_count", "BIGINT", COUNTER, None),
        col("reports_count", "BIGINT", COUNTER, None),
        col("delta_views_count", "BIGINT", COUNTER, None),
        col("delta_likes_count", "BIGINT", COUNTER, None),
        col("delta_comments_count", "BIGINT", COUNTER, None),
        col("delta_reports_count", "BIGINT", COUNTER, None),
        col("created_at", TIMESTAMP, "NOT NULL", None),
        col("updated_at", TIMESTAMP, "NOT NULL", None),
    ],
    indexes: &[
        IndexDescriptor {
            name: "idx_video_snapshots_video_id",
            columns: &["video_id"],
        },
        IndexDescriptor {
            name: "idx_video_snapshots_created_at",
            columns: &["created_at"],
        },
        IndexDescriptor {
            name: "idx_video_snapshots_video_created",
            columns: &["video_id", "created_at"],
        },
    ],
};

pub const VIDEO_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    tables: &[VIDEOS, VIDEO_SNAPSHOTS],
};

impl SchemaDescriptor {
    /// Renders the schema as `CREATE TABLE` / `CREATE INDEX` text for the prompt.
    pub fn to_ddl(&self) -> String {
        let mut ddl = String::new();

        for table in self.tables {
            let _ = writeln!(ddl, "CREATE TABLE {} (", table.name);
            let last = table.columns.len().saturating_sub(1);
            for (i, column) in table.columns.iter().enumerate() {
                let sep = if i == last { "" } else { "," };
                let _ = write!(
                    ddl,
                    "    {} {} {}{}",
                    column.name, column.sql_type, column.constraints, sep
                );
                if let Some(comment) = column.comment {
                    let _ = write!(ddl, "  -- {}", comment);
                }
                ddl.push('\n');
            }
            ddl.push_str(");\n\n");
        }

        ddl.push_str("-- Indexes\n");
        for table in self.tables {
            for index in table.indexes {
                let _ = writeln!(
                    ddl,
                    "CREATE INDEX {} ON {}({});",
                    index.name,
                    table.name,
                    index.columns.join(", ")
                );
            }
        }

        ddl
    }
}
