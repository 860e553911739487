//! Cross-line cursor state for a single scan.

/// Which BSR block the scan is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// "This system is the Bootstrap Router" / the elected BSR view.
    Election,
    /// "This system is (a) candidate BSR".
    CandidateBsr,
    /// "Candidate RP: ..." block.
    CandidateRp,
}

/// Mutable cursor carried from line to line.
///
/// Header rules update it before field rules read it; nothing ever resets a
/// field except the next header that sets it again.
#[derive(Debug, Clone)]
pub struct Context {
    vrf: String,
    /// Interface opened by the last interface header.
    pub interface: Option<String>,
    /// Group range opened by the last `Group(s)` header.
    pub group: Option<String>,
    /// RP or candidate identity opened by the last RP header.
    pub rp: Option<String>,
    pub rp_host: Option<String>,
    pub rp_version: Option<String>,
    /// Discovery protocol announced by a header (`static` mapping blocks).
    pub protocol: Option<&'static str>,
    /// Composite key of the entry the next field lines attach to.
    pub entry: Option<EntryKey>,
    pub section: Option<Section>,
    /// Scope range printed above the BSR views; written once an elected
    /// view appears.
    pub scope_range: Option<String>,
}

/// Identity of one RP-mapping entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKey {
    pub group: String,
    pub rp: String,
    pub protocol: &'static str,
}

impl EntryKey {
    /// Key under `rp_mappings`: `"<group> <rp> <protocol>"`.
    pub fn mapping_key(&self) -> String {
        format!("{} {} {}", self.group, self.rp, self.protocol)
    }

    /// Key under `rp_list`: `"<rp> <protocol>"`.
    pub fn rp_list_key(&self) -> String {
        format!("{} {}", self.rp, self.protocol)
    }
}

impl Context {
    pub fn new(vrf: &str) -> Self {
        Self {
            vrf: vrf.to_string(),
            interface: None,
            group: None,
            rp: None,
            rp_host: None,
            rp_version: None,
            protocol: None,
            entry: None,
            section: None,
            scope_range: None,
        }
    }

    /// VRF the record is rooted at; fixed for the whole scan.
    pub fn vrf(&self) -> &str {
        &self.vrf
    }

    /// Opens a new group block, forgetting the RP identity of the previous
    /// one.
    pub fn open_group(&mut self, group: &str, protocol: Option<&'static str>) {
        self.group = Some(group.to_string());
        self.protocol = protocol;
        self.rp = None;
        self.rp_host = None;
        self.rp_version = None;
        self.entry = None;
    }
}
