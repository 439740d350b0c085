// Connection string keys.
pub const USE_DEVELOPMENT_STORAGE: &str = "UseDevelopmentStorage";
pub const DEVELOPMENT_STORAGE_PROXY_URI: &str = "DevelopmentStorageProxyUri";
pub const DEFAULT_ENDPOINTS_PROTOCOL: &str = "DefaultEndpointsProtocol";
pub const ACCOUNT_NAME: &str = "AccountName";
pub const ACCOUNT_KEY: &str = "AccountKey";
pub const BLOB_ENDPOINT: &str = "BlobEndpoint";
pub const QUEUE_ENDPOINT: &str = "QueueEndpoint";
pub const TABLE_ENDPOINT: &str = "TableEndpoint";
pub const FILE_ENDPOINT: &str = "FileEndpoint";

/// Every key a connection string may carry.
pub const CONNECTION_STRING_KEYS: [&str; 9] = [
    USE_DEVELOPMENT_STORAGE,
    DEVELOPMENT_STORAGE_PROXY_URI,
    DEFAULT_ENDPOINTS_PROTOCOL,
    ACCOUNT_NAME,
    ACCOUNT_KEY,
    BLOB_ENDPOINT,
    QUEUE_ENDPOINT,
    TABLE_ENDPOINT,
    FILE_ENDPOINT,
];

// Standard DNS suffixes per service.
pub const BLOB_BASE_DNS_NAME: &str = "blob.core.windows.net";
pub const QUEUE_BASE_DNS_NAME: &str = "queue.core.windows.net";
pub const TABLE_BASE_DNS_NAME: &str = "table.core.windows.net";
pub const FILE_BASE_DNS_NAME: &str = "file.core.windows.net";

// Development storage defaults.
pub const DEV_STORE_NAME: &str = "devstoreaccount1";
pub const DEV_STORE_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
pub const DEV_STORE_URI: &str = "http://127.0.0.1";
pub const DEV_STORE_BLOB_PORT: u16 = 10000;
pub const DEV_STORE_QUEUE_PORT: u16 = 10001;
pub const DEV_STORE_TABLE_PORT: u16 = 10002;

// Env values used to configure the client.
pub const AZURE_STORAGE_CONNECTION_STRING: &str = "AZURE_STORAGE_CONNECTION_STRING";
pub const AZURE_STORAGE_ACCOUNT_NAME: &str = "AZURE_STORAGE_ACCOUNT_NAME";
pub const AZURE_STORAGE_ACCOUNT_KEY: &str = "AZURE_STORAGE_ACCOUNT_KEY";
pub const AZURE_STORAGE_FILE_ENDPOINT: &str = "AZURE_STORAGE_FILE_ENDPOINT";

// Headers used in file service requests.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_VERSION: &str = "x-ms-version";
pub const X_MS_TYPE: &str = "x-ms-type";
pub const X_MS_WRITE: &str = "x-ms-write";
pub const X_MS_CONTENT_LENGTH: &str = "x-ms-content-length";
pub const X_MS_CONTENT_TYPE: &str = "x-ms-content-type";
pub const X_MS_CONTENT_ENCODING: &str = "x-ms-content-encoding";
pub const X_MS_CONTENT_LANGUAGE: &str = "x-ms-content-language";
pub const X_MS_CONTENT_MD5: &str = "x-ms-content-md5";
pub const X_MS_CACHE_CONTROL: &str = "x-ms-cache-control";
pub const X_MS_CONTENT_DISPOSITION: &str = "x-ms-content-disposition";
pub const X_MS_META_PREFIX: &str = "x-ms-meta-";
pub const CONTENT_MD5: &str = "content-md5";

/// Prefix of the headers that take part in canonicalization.
pub const X_MS_PREFIX: &str = "x-ms-";

pub const FILE_API_VERSION: &str = "2015-04-05";
pub const FILE_TYPE: &str = "File";
pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";
pub const URL_ENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const USER_AGENT: &str = concat!("azfile/", env!("CARGO_PKG_VERSION"));

// Query parameters.
pub const QP_REST_TYPE: &str = "restype";
pub const QP_COMP: &str = "comp";
pub const QP_TIMEOUT: &str = "timeout";

/// Largest range a single write may carry: 4 MiB.
pub const MAX_RANGE_SIZE: usize = 4 * 1024 * 1024;
