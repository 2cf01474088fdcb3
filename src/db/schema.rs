pub const SCHEMA_VERSION: i32 = 2;

pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS dossiers (
    id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    dob TEXT,
    parents TEXT,
    history TEXT,
    traumas TEXT,
    habits TEXT,
    communication_style TEXT,
    friendliness_level INTEGER,
    relation TEXT,
    last_contact_date TEXT,
    photo TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_dossier_name ON dossiers(full_name);
CREATE INDEX IF NOT EXISTS idx_dossier_updated ON dossiers(updated_at);

CREATE TABLE IF NOT EXISTS facts (
    id TEXT PRIMARY KEY,
    dossier_id TEXT NOT NULL,
    date TEXT,
    title TEXT,
    note TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (dossier_id) REFERENCES dossiers(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_fact_dossier ON facts(dossier_id);
"#;

/// V2 migration: stories, the long-form sibling of facts
pub const MIGRATION_V2: &str = r#"
CREATE TABLE IF NOT EXISTS stories (
    id TEXT PRIMARY KEY,
    dossier_id TEXT NOT NULL,
    date TEXT,
    title TEXT,
    content TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (dossier_id) REFERENCES dossiers(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_story_dossier ON stories(dossier_id);
"#;
