use redb::TableDefinition;

/// Articles table: article id -> ArticleRecord (serialized)
pub const ARTICLES: TableDefinition<u64, &[u8]> = TableDefinition::new("articles");

/// Counters table: counter name -> next value
/// Holds the monotonic article id allocator; ids are never reused.
pub const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Users table: user id -> UserRecord (serialized)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Email uniqueness index: email -> user id
pub const USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails");

/// Marks table: (user id, article id) -> MarkRecord (serialized)
/// The composite key makes duplicate mark rows unrepresentable.
pub const MARKS: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("marks");

/// Read counts table: (user id, article id) -> ReadCountRecord (serialized)
pub const READ_COUNTS: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("read_counts");

/// Email cooldowns table: email -> CooldownRecord (serialized)
pub const EMAIL_COOLDOWNS: TableDefinition<&str, &[u8]> = TableDefinition::new("email_cooldowns");

/// Sessions table: bearer token -> SessionRecord (serialized)
pub const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// One-time codes table: email -> OtpRecord (serialized, code stored hashed)
pub const OTP_CODES: TableDefinition<&str, &[u8]> = TableDefinition::new("otp_codes");
