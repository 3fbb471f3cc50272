use std::any::Any;

/// 内核产生的响应，由同一内核负责发送
pub trait Response: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// 具体响应类型的名称，用于错误信息
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Response {
    pub fn downcast_ref<T: Response>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// 纯文本响应
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextResponse {
    body: String,
}

impl TextResponse {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Response for TextResponse {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Opaque;

    impl Response for Opaque {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_downcast_response() {
        let response: Box<dyn Response> = Box::new(TextResponse::new("hello"));
        assert_eq!(response.downcast_ref::<TextResponse>().map(TextResponse::body), Some("hello"));

        let opaque: Box<dyn Response> = Box::new(Opaque);
        assert!(opaque.downcast_ref::<TextResponse>().is_none());
        assert!(opaque.type_name().ends_with("Opaque"));
    }
}
