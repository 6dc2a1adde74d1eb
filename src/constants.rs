// Messages
pub const MESSAGE_REQUIRED_FIELDS: &str = "Matéria e descrição são obrigatórios";
pub const MESSAGE_ATIVIDADE_NOT_FOUND: &str = "Atividade não encontrada";
pub const MESSAGE_FILE_NOT_FOUND: &str = "Arquivo não encontrado";
pub const MESSAGE_ACCESS_DENIED: &str = "Acesso negado";
pub const MESSAGE_WRONG_PASSWORD: &str = "Senha incorreta";
pub const MESSAGE_INVALID_GRADE: &str = "Nota inválida";
pub const MESSAGE_INVALID_DUE_DATE: &str = "Data de entrega inválida";
pub const MESSAGE_UPLOAD_TOO_LARGE: &str = "Arquivo excede o tamanho máximo permitido";
pub const MESSAGE_BAD_FORM: &str = "Formulário inválido";
pub const MESSAGE_INTERNAL_SERVER_ERROR: &str = "Erro interno do servidor";

// Session
pub const SESSION_COOKIE_NAME: &str = "atividades_session";
pub const SESSION_ID_KEY: &str = "sid";
pub const ADMIN_GRANT_TTL_HOURS: i64 = 24;

// Form fields (multipart). Portuguese names come first, english ones are aliases.
pub const FIELD_SUBJECT: [&str; 2] = ["materia", "subject"];
pub const FIELD_DESCRIPTION: [&str; 2] = ["descricao", "description"];
pub const FIELD_GRADE: [&str; 2] = ["nota", "grade"];
pub const FIELD_DUE_DATE: [&str; 2] = ["dataEntrega", "dueDate"];
pub const FIELD_FILE: [&str; 3] = ["arquivo", "file", "attachment"];
pub const FIELD_REMOVE_ATTACHMENT: [&str; 2] = ["removerAnexo", "removeAttachment"];

// Routes used for redirects
pub const ROUTE_HOME: &str = "/";
pub const ROUTE_ADMIN: &str = "/admin";

// Dates are exchanged as ISO calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Defaults
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ADMIN_PASSWORD: &str = "12345";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/atividades.db";
pub const DEFAULT_BLOB_DIR: &str = "data/blobs";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const MIME_OCTET_STREAM: &str = "application/octet-stream";
