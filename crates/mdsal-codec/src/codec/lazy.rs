// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container nodes translated on first access.

use crate::binding::DataObject;
use crate::data::ContainerNode;
use crate::error::CodecError;
use crate::model::{QName, SchemaPath};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Turns the object rooted at a schema path into its container node.
pub trait ContainerSerializer: Send + Sync {
    fn serialize_container(
        &self,
        path: &SchemaPath,
        data: &DataObject,
    ) -> Result<ContainerNode, CodecError>;
}

/// A container node backed by a data object.
///
/// The object is translated at most once, on the first [`delegate`] call;
/// later calls return the memoized node. Only the memo slot is locked.
///
/// [`delegate`]: BindingLazyContainerNode::delegate
pub struct BindingLazyContainerNode {
    identifier: QName,
    path: SchemaPath,
    data: DataObject,
    serializer: Arc<dyn ContainerSerializer>,
    slot: Mutex<Option<Arc<ContainerNode>>>,
}

impl BindingLazyContainerNode {
    pub fn new(
        identifier: QName,
        path: SchemaPath,
        data: DataObject,
        serializer: Arc<dyn ContainerSerializer>,
    ) -> Self {
        Self {
            identifier,
            path,
            data,
            serializer,
            slot: Mutex::new(None),
        }
    }

    pub fn identifier(&self) -> &QName {
        &self.identifier
    }

    /// Source object; never triggers translation.
    pub fn binding_data(&self) -> &DataObject {
        &self.data
    }

    /// The translated node.
    pub fn delegate(&self) -> Result<Arc<ContainerNode>, CodecError> {
        let mut slot = self.slot.lock();
        if let Some(node) = slot.as_ref() {
            return Ok(node.clone());
        }
        let mut node = self.serializer.serialize_container(&self.path, &self.data)?;
        node.identifier = self.identifier.clone();
        let node = Arc::new(node);
        *slot = Some(node.clone());
        Ok(node)
    }

    pub fn is_materialized(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl fmt::Debug for BindingLazyContainerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingLazyContainerNode")
            .field("identifier", &self.identifier)
            .field("path", &self.path)
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::TypeName;
    use crate::model::QNameModule;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl ContainerSerializer for Counting {
        fn serialize_container(
            &self,
            path: &SchemaPath,
            _data: &DataObject,
        ) -> Result<ContainerNode, CodecError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let qname = path
                .last()
                .cloned()
                .ok_or_else(|| CodecError::invalid_argument("empty"))?;
            Ok(ContainerNode::new(qname))
        }
    }

    fn node(serializer: Arc<Counting>) -> BindingLazyContainerNode {
        let ns = QNameModule::new("urn:test:lazy", None);
        let input = QName::new(&ns, "input");
        BindingLazyContainerNode::new(
            input.clone(),
            SchemaPath::new(vec![QName::new(&ns, "op"), input]),
            DataObject::new(TypeName::new("gen::v1::test::lazy::norev", "OpInput")),
            serializer,
        )
    }

    #[test]
    fn test_accessors_do_not_materialize() {
        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let lazy = node(counting.clone());
        assert_eq!(lazy.identifier().local_name(), "input");
        assert_eq!(lazy.binding_data().type_name().name(), "OpInput");
        assert!(!lazy.is_materialized());
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_delegate_materializes_once() {
        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let lazy = Arc::new(node(counting.clone()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lazy = lazy.clone();
                std::thread::spawn(move || lazy.delegate().unwrap())
            })
            .collect();
        let nodes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
        assert!(nodes.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert!(lazy.is_materialized());
    }
}
