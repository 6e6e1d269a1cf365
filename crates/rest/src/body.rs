use bytes::Bytes;

/// The payload of a response produced by an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBody {
    inner: Bytes,
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self { inner: Bytes::new() }
    }

    pub fn once(bytes: Bytes) -> Self {
        Self { inner: bytes }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Bytes {
        self.inner
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        Self::once(bytes)
    }
}

impl From<String> for ResponseBody {
    fn from(value: String) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(value: Vec<u8>) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<&'static str> for ResponseBody {
    fn from(value: &'static str) -> Self {
        Self::once(Bytes::from_static(value.as_bytes()))
    }
}

impl From<()> for ResponseBody {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl From<Option<Bytes>> for ResponseBody {
    fn from(option: Option<Bytes>) -> Self {
        option.map_or_else(Self::empty, Self::once)
    }
}

#[cfg(test)]
mod tests {
    use crate::body::ResponseBody;
    use bytes::Bytes;

    #[test]
    fn test_string_body() {
        let body = ResponseBody::from("Hello world".to_string());
        assert_eq!(body.len(), 11);
        assert_eq!(body.into_bytes(), Bytes::from("Hello world"));
    }

    #[test]
    fn test_empty_body() {
        assert!(ResponseBody::from("").is_empty());
        assert!(ResponseBody::from(()).is_empty());
        assert!(ResponseBody::from(None::<Bytes>).is_empty());
        assert_eq!(ResponseBody::from(Some(Bytes::from_static(b"x"))).as_bytes(), b"x");
    }
}
