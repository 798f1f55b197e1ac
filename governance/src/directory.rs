//! Current validator descriptors by operator address.

use crate::reducer::LatestStateReducer;
use stakeview_store::ValidatorDescriptor;
use stakeview_types::OperatorAddress;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct ValidatorDirectory {
    descriptors: HashMap<OperatorAddress, ValidatorDescriptor>,
}

impl ValidatorDirectory {
    /// Keep the latest descriptor revision per operator.
    pub fn build(descriptors: impl IntoIterator<Item = ValidatorDescriptor>) -> Self {
        Self {
            descriptors: LatestStateReducer::reduce(descriptors),
        }
    }

    pub fn get(&self, operator: &OperatorAddress) -> Option<&ValidatorDescriptor> {
        self.descriptors.get(operator)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidatorDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakeview_types::{AccountAddress, Height};

    fn descriptor(operator: &str, moniker: &str, height: u64) -> ValidatorDescriptor {
        ValidatorDescriptor {
            moniker: moniker.to_string(),
            height: Height::new(height),
            self_delegate_address: Some(AccountAddress::new(format!("{operator}-self"))),
            ..ValidatorDescriptor::bare(OperatorAddress::new(operator))
        }
    }

    #[test]
    fn latest_descriptor_wins() {
        let directory = ValidatorDirectory::build(vec![
            descriptor("v1", "old name", 5),
            descriptor("v1", "new name", 9),
            descriptor("v2", "other", 1),
        ]);
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get(&OperatorAddress::new("v1")).unwrap().moniker, "new name");
    }
}
