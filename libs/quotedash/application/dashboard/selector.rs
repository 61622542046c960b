//! Contract selector backing the side panel
//!
//! Contracts are grouped by security type and product category. The cursor
//! only rests on contracts; group headers are skipped.

use crate::domain::Contract;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorEntry {
    Group(String),
    Contract(Contract),
}

#[derive(Debug, Clone)]
pub struct ContractSelector {
    entries: Vec<SelectorEntry>,
    cursor: Option<usize>,
    /// Code of the contract currently displayed
    active: Option<String>,
    visible: bool,
}

impl ContractSelector {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            active: None,
            visible: true,
        }
    }

    /// Rebuild the entry list from the broker catalog
    pub fn set_contracts(&mut self, contracts: &[Contract]) {
        let mut sorted: Vec<&Contract> = contracts.iter().collect();
        sorted.sort_by(|a, b| {
            (a.security_type, &a.category, &a.symbol).cmp(&(b.security_type, &b.category, &b.symbol))
        });

        self.entries.clear();
        let mut current_group: Option<String> = None;
        for contract in sorted {
            let group = group_label(contract);
            if current_group.as_deref() != Some(group.as_str()) {
                self.entries.push(SelectorEntry::Group(group.clone()));
                current_group = Some(group);
            }
            self.entries.push(SelectorEntry::Contract(contract.clone()));
        }

        let first = self.contract_indices().next();
        self.cursor = first;
        if let Some(code) = self.active.clone() {
            self.mark_active(&code);
        }
    }

    pub fn entries(&self) -> &[SelectorEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn active_code(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Record the displayed contract and move the cursor onto it
    pub fn mark_active(&mut self, code: &str) {
        self.active = Some(code.to_string());
        if let Some(idx) = self
            .entries
            .iter()
            .position(|e| matches!(e, SelectorEntry::Contract(c) if c.code == code))
        {
            self.cursor = Some(idx);
        }
    }

    pub fn highlighted(&self) -> Option<&Contract> {
        match self.cursor.and_then(|i| self.entries.get(i)) {
            Some(SelectorEntry::Contract(c)) => Some(c),
            _ => None,
        }
    }

    pub fn next(&mut self) {
        let indices: Vec<usize> = self.contract_indices().collect();
        if indices.is_empty() {
            return;
        }
        let pos = self
            .cursor
            .and_then(|c| indices.iter().position(|&i| i == c))
            .map(|p| (p + 1) % indices.len())
            .unwrap_or(0);
        self.cursor = Some(indices[pos]);
    }

    pub fn prev(&mut self) {
        let indices: Vec<usize> = self.contract_indices().collect();
        if indices.is_empty() {
            return;
        }
        let pos = self
            .cursor
            .and_then(|c| indices.iter().position(|&i| i == c))
            .map(|p| if p == 0 { indices.len() - 1 } else { p - 1 })
            .unwrap_or(0);
        self.cursor = Some(indices[pos]);
    }

    /// Contract under the cursor if it differs from the displayed one
    pub fn confirm(&self) -> Option<Contract> {
        let contract = self.highlighted()?;
        if self.active.as_deref() == Some(contract.code.as_str()) {
            None
        } else {
            Some(contract.clone())
        }
    }

    fn contract_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, SelectorEntry::Contract(_)))
            .map(|(i, _)| i)
    }
}

impl Default for ContractSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn group_label(contract: &Contract) -> String {
    if contract.category.is_empty() {
        contract.security_type.label().to_string()
    } else {
        format!("{}/{}", contract.security_type.label(), contract.category)
    }
}
