use serde::Deserialize;

/// A binary file attached to a release. The name is used verbatim as the
/// on-disk file name inside the release directory.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// A tagged publication of the repository. The tag name is used verbatim
/// as a directory name; unsafe tags are rejected, never sanitized.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Release {
    pub name: Option<String>,
    pub tag_name: String,
    pub body: Option<String>,
    pub tarball_url: String,
    pub zipball_url: String,
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Label {
    pub name: String,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Milestone {
    pub title: String,
}

/// One issue or pull request. Both list endpoints share this projection;
/// only these seven fields are retained from the API payload.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct IssueRecord {
    pub number: u64,
    pub state: String,
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub comments_url: String,
}
