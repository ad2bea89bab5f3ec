#![allow(dead_code)]

use accessrecon::catalog::FunctionalityRecord;
use accessrecon::extract::RawGrid;

pub const RISK_WIDTH: usize = 22;
pub const PROFILE_WIDTH: usize = 14;

pub fn record(id: &str, name: &str, module: &str) -> FunctionalityRecord {
    FunctionalityRecord {
        id: id.to_string(),
        name: name.to_string(),
        module_id: format!("{}-id", module),
        module: module.to_string(),
    }
}

/// Builds grids shaped like a ticket analysis export
#[derive(Default)]
pub struct SheetBuilder {
    rows: Vec<Vec<String>>,
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, text: &str) -> Self {
        self.rows.push(vec![text.to_string()]);
        self
    }

    pub fn header(mut self, width: usize) -> Self {
        self.rows
            .push((0..width).map(|i| format!("Col {}", i)).collect());
        self
    }

    pub fn blank(mut self) -> Self {
        self.rows.push(Vec::new());
        self
    }

    /// Profile/status row; the functionality is split over two merged cells
    pub fn profile_row(mut self, profile: &str, system: &str, functionality: &str, status: &str) -> Self {
        let mut row = vec![String::new(); PROFILE_WIDTH];
        row[0] = profile.to_string();
        row[4] = system.to_string();
        let split = functionality.len() / 2;
        row[8] = functionality[..split].to_string();
        row[9] = functionality[split..].to_string();
        row[12] = status.to_string();
        self.rows.push(row);
        self
    }

    /// Risk row; trailing cells past the second functionality are left off
    pub fn risk_row(
        mut self,
        risk_id: &str,
        description: &str,
        module: &str,
        functionality: &str,
        functionality_2: &str,
    ) -> Self {
        let mut row = vec![String::new(); RISK_WIDTH - 1];
        row[0] = risk_id.to_string();
        row[2] = description.to_string();
        row[6] = "High".to_string();
        row[8] = "Controller".to_string();
        row[10] = "ERP".to_string();
        row[12] = module.to_string();
        row[14] = "Maintain".to_string();
        row[16] = functionality.to_string();
        row[18] = "Execute".to_string();
        row[20] = functionality_2.to_string();
        self.rows.push(row);
        self
    }

    pub fn build(self) -> RawGrid {
        RawGrid::new(self.rows)
    }
}
