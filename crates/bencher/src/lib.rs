//! Shared fixtures for the parser benchmarks.

/// A named input fed to a benchmark.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, file: TestFile) -> Self {
        Self { name, group, file }
    }

    pub fn small(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Small, file)
    }

    pub fn large(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Large, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn file_name(&self) -> &'static str {
        self.file().file_name
    }

    /// Size of the input, for criterion throughput reports.
    pub fn byte_len(&self) -> u64 {
        self.file.content.len() as u64
    }
}

/// Raw HTTP bytes loaded from `resources/`, tagged with the message kind they hold.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    kind: MessageKind,
    content: &'static str,
}

impl TestFile {
    pub const fn request(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, kind: MessageKind::Request, content }
    }

    pub const fn response(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, kind: MessageKind::Response, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.content.as_bytes()
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Large,
}
