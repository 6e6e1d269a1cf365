/// A path to resolve against a route table, together with the route expected to take it.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    path: &'static str,
    expected: Option<&'static str>,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, path: &'static str, expected: Option<&'static str>) -> Self {
        Self { name, group, path, expected }
    }

    /// A path some route should match, `expected` is that route's name
    pub fn hit(name: &'static str, group: TestGroup, path: &'static str, expected: &'static str) -> Self {
        Self::new(name, group, path, Some(expected))
    }

    /// A path no route should match
    pub fn miss(name: &'static str, group: TestGroup, path: &'static str) -> Self {
        Self::new(name, group, path, None)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn expected(&self) -> Option<&'static str> {
        self.expected
    }
}

/// A route template with the name it is registered under.
#[derive(Debug, Copy, Clone)]
pub struct RouteFixture {
    name: &'static str,
    template: &'static str,
}

impl RouteFixture {
    pub const fn new(name: &'static str, template: &'static str) -> Self {
        Self { name, template }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn template(&self) -> &'static str {
        self.template
    }
}

/// Where in the route table the matching route sits
#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Head,
    Middle,
    Tail,
}

/// A typical REST surface, scanned in this order.
pub static ROUTES: &[RouteFixture] = &[
    RouteFixture::new("index", "/"),
    RouteFixture::new("health", "/health"),
    RouteFixture::new("me", "/users/me"),
    RouteFixture::new("users", "/users"),
    RouteFixture::new("user", "/users/{id:int}"),
    RouteFixture::new("user_posts", "/users/{id:int}/posts"),
    RouteFixture::new("user_post", "/users/{id:int}/posts/{post:int}"),
    RouteFixture::new("post_comments", "/users/{id:int}/posts/{post:int}/comments"),
    RouteFixture::new("orgs", "/orgs"),
    RouteFixture::new("org", "/orgs/{org:alnum}"),
    RouteFixture::new("org_repos", "/orgs/{org:alnum}/repos"),
    RouteFixture::new("repo", "/repos/{owner:alnum}/{repo}"),
    RouteFixture::new("repo_issue", "/repos/{owner:alnum}/{repo}/issues/{number:int}"),
    RouteFixture::new("commit", "/repos/{owner:alnum}/{repo}/commits/{sha:hex}"),
    RouteFixture::new("session", "/sessions/{token:uuid}"),
];
