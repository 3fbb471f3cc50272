//! 内核请求
//!
//! 汇集进程环境中的请求数据；各 SAPI 的请求类型由它转换而来。

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};

/// 参数表
pub type Parameters = BTreeMap<String, String>;

/// 与请求头对应的服务器变量（不带 `HTTP_` 前缀）
const COPY_SERVER: [(&str, &str); 3] = [
    ("CONTENT_TYPE", "Content-Type"),
    ("CONTENT_LENGTH", "Content-Length"),
    ("CONTENT_MD5", "Content-Md5"),
];

/// 进程级请求数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    server: Parameters,
    query: Parameters,
    post: Parameters,
    files: Parameters,
    cookies: Parameters,
    session: Parameters,
    request: Parameters,
    env: Parameters,
    headers: Parameters,
    arguments: Vec<String>,
}

impl Request {
    /// 完全从进程环境采集
    pub fn capture() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn server(&self) -> &Parameters {
        &self.server
    }

    pub fn query(&self) -> &Parameters {
        &self.query
    }

    pub fn post(&self) -> &Parameters {
        &self.post
    }

    pub fn files(&self) -> &Parameters {
        &self.files
    }

    pub fn cookies(&self) -> &Parameters {
        &self.cookies
    }

    pub fn session(&self) -> &Parameters {
        &self.session
    }

    /// query 与 post 的并集，post 优先
    pub fn request(&self) -> &Parameters {
        &self.request
    }

    pub fn env(&self) -> &Parameters {
        &self.env
    }

    pub fn headers(&self) -> &Parameters {
        &self.headers
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// 请求构建器：未覆盖的字段在 `build` 时从进程环境推导
#[derive(Debug, Default)]
pub struct RequestBuilder {
    server: Option<Parameters>,
    query: Option<Parameters>,
    post: Option<Parameters>,
    files: Option<Parameters>,
    cookies: Option<Parameters>,
    session: Option<Parameters>,
    request: Option<Parameters>,
    env: Option<Parameters>,
    headers: Option<Parameters>,
    arguments: Vec<String>,
}

impl RequestBuilder {
    pub fn server(mut self, server: Parameters) -> Self {
        self.server = Some(server);
        self
    }

    pub fn query(mut self, query: Parameters) -> Self {
        self.query = Some(query);
        self
    }

    pub fn post(mut self, post: Parameters) -> Self {
        self.post = Some(post);
        self
    }

    pub fn files(mut self, files: Parameters) -> Self {
        self.files = Some(files);
        self
    }

    pub fn cookies(mut self, cookies: Parameters) -> Self {
        self.cookies = Some(cookies);
        self
    }

    pub fn session(mut self, session: Parameters) -> Self {
        self.session = Some(session);
        self
    }

    pub fn request(mut self, request: Parameters) -> Self {
        self.request = Some(request);
        self
    }

    pub fn env(mut self, env: Parameters) -> Self {
        self.env = Some(env);
        self
    }

    pub fn headers(mut self, headers: Parameters) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Request {
        let process_env = || -> Parameters {
            std::env::vars_os()
                .map(|(key, value)| (key.to_string_lossy().into_owned(), value.to_string_lossy().into_owned()))
                .collect()
        };

        let server = self.server.unwrap_or_else(process_env);
        let query = self
            .query
            .unwrap_or_else(|| server.get("QUERY_STRING").map(|q| parse_pairs(q, '&')).unwrap_or_default());
        let post = self.post.unwrap_or_default();
        let cookies = self
            .cookies
            .unwrap_or_else(|| server.get("HTTP_COOKIE").map(|c| parse_pairs(c, ';')).unwrap_or_default());
        let request = self.request.unwrap_or_else(|| {
            let mut merged = query.clone();
            merged.extend(post.clone());
            merged
        });
        let headers = self.headers.unwrap_or_else(|| headers_from_server(&server));

        Request {
            query,
            post,
            files: self.files.unwrap_or_default(),
            cookies,
            session: self.session.unwrap_or_default(),
            request,
            env: self.env.unwrap_or_else(process_env),
            headers,
            arguments: self.arguments,
            server,
        }
    }
}

/// 从服务器变量推导请求头
///
/// `HTTP_*` 变量转换为首字母大写、以 `-` 连接的名称；
/// `CONTENT_TYPE`、`CONTENT_LENGTH`、`CONTENT_MD5` 直接复制；
/// 缺少 `Authorization` 时依次尝试 `REDIRECT_HTTP_AUTHORIZATION`、
/// `AUTH_USER`/`AUTH_PW`（Basic）和 `AUTH_DIGEST`。
pub fn headers_from_server(server: &Parameters) -> Parameters {
    let mut headers = Parameters::new();

    for (key, value) in server {
        if let Some(name) = key.strip_prefix("HTTP_") {
            let copied = COPY_SERVER.iter().any(|(variable, _)| *variable == name) && server.contains_key(name);
            if !copied {
                headers.insert(header_name(name), value.clone());
            }
        } else if let Some((_, header)) = COPY_SERVER.iter().find(|(variable, _)| *variable == key.as_str()) {
            headers.insert((*header).to_string(), value.clone());
        }
    }

    if !headers.contains_key("Authorization") {
        let authorization = if let Some(redirected) = server.get("REDIRECT_HTTP_AUTHORIZATION") {
            Some(redirected.clone())
        } else if let Some(user) = server.get("AUTH_USER") {
            let password = server.get("AUTH_PW").map(String::as_str).unwrap_or("");
            Some(format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password))))
        } else {
            server.get("AUTH_DIGEST").cloned()
        };

        if let Some(authorization) = authorization {
            headers.insert("Authorization".to_string(), authorization);
        }
    }

    headers
}

/// `X_FORWARDED_FOR` -> `X-Forwarded-For`
fn header_name(variable: &str) -> String {
    variable
        .to_lowercase()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

/// `a=1&b=2` 形式的键值对，不做百分号解码
fn parse_pairs(input: &str, separator: char) -> Parameters {
    input
        .split(separator)
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}
