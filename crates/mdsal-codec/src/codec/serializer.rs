// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer facade.
//!
//! [`BindingCodecContext`] owns the current [`CodecTree`] (runtime context
//! plus compiled node codecs) behind an `ArcSwap`. Every call loads one
//! snapshot and works against it, so a concurrent
//! [`update_runtime_context`](BindingCodecContext::update_runtime_context)
//! never exposes a half-built index.

use super::defaults::DefaultValueMaterializer;
use super::identifier::IdentifierTranslator;
use super::lazy::{BindingLazyContainerNode, ContainerSerializer};
use super::structural::{CodecCache, StructuralCodec};
use crate::binding::{BindingValue, DataObject, InstanceIdentifier, Notification, TypeKind, TypeName};
use crate::config::CodecConfig;
use crate::data::{ContainerNode, NormalizedNode, YangInstanceIdentifier};
use crate::error::{CodecError, SchemaError};
use crate::index::{BindingRuntimeContext, Renames};
use crate::model::{OperationSchema, QName, SchemaContext, SchemaPath};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::SystemTime;

/// Translation between the binding and normalized representations.
pub trait BindingNormalizedNodeSerializer {
    // ========================================================================
    // Identifiers
    // ========================================================================

    fn to_yang_instance_identifier(
        &self,
        binding: &InstanceIdentifier,
    ) -> Result<YangInstanceIdentifier, CodecError>;

    /// `None` when the path has no binding counterpart.
    fn from_yang_instance_identifier(
        &self,
        dom: &YangInstanceIdentifier,
    ) -> Result<Option<InstanceIdentifier>, CodecError>;

    // ========================================================================
    // Data
    // ========================================================================

    fn to_normalized_node(
        &self,
        path: &InstanceIdentifier,
        data: &DataObject,
    ) -> Result<(YangInstanceIdentifier, NormalizedNode), CodecError>;

    fn from_normalized_node(
        &self,
        path: &YangInstanceIdentifier,
        data: &NormalizedNode,
    ) -> Result<Option<(InstanceIdentifier, DataObject)>, CodecError>;

    // ========================================================================
    // Notifications and operations
    // ========================================================================

    /// `None` when `path` is not a notification.
    fn from_normalized_node_notification(
        &self,
        path: &SchemaPath,
        data: &ContainerNode,
        event_instant: Option<SystemTime>,
    ) -> Result<Option<Notification>, CodecError>;

    /// `None` when `path` is not an rpc input or output.
    fn from_normalized_node_rpc_data(
        &self,
        path: &SchemaPath,
        data: &ContainerNode,
    ) -> Result<Option<DataObject>, CodecError>;

    fn from_normalized_node_action_input(
        &self,
        action: &TypeName,
        input: &ContainerNode,
    ) -> Result<DataObject, CodecError>;

    fn from_normalized_node_action_output(
        &self,
        action: &TypeName,
        output: &ContainerNode,
    ) -> Result<DataObject, CodecError>;

    fn to_normalized_node_notification(
        &self,
        notification: &Notification,
    ) -> Result<ContainerNode, CodecError>;

    fn to_normalized_node_rpc_data(&self, data: &DataObject) -> Result<ContainerNode, CodecError>;

    fn to_normalized_node_action_input(
        &self,
        action: &TypeName,
        input: &DataObject,
    ) -> Result<ContainerNode, CodecError>;

    fn to_normalized_node_action_output(
        &self,
        action: &TypeName,
        output: &DataObject,
    ) -> Result<ContainerNode, CodecError>;

    fn to_lazy_normalized_node_action_input(
        &self,
        action: &TypeName,
        identifier: QName,
        input: DataObject,
    ) -> Result<BindingLazyContainerNode, CodecError>;

    fn to_lazy_normalized_node_action_output(
        &self,
        action: &TypeName,
        identifier: QName,
        output: DataObject,
    ) -> Result<BindingLazyContainerNode, CodecError>;

    /// Lazy input named after the action's `input` node.
    fn to_lazy_normalized_node_action_input_default(
        &self,
        action: &TypeName,
        input: DataObject,
    ) -> Result<BindingLazyContainerNode, CodecError>;

    /// Lazy output named after the action's `output` node.
    fn to_lazy_normalized_node_action_output_default(
        &self,
        action: &TypeName,
        output: DataObject,
    ) -> Result<BindingLazyContainerNode, CodecError>;
}

/// A runtime context and the node codecs compiled against it.
#[derive(Debug)]
pub struct CodecTree {
    runtime: Arc<BindingRuntimeContext>,
    cache: CodecCache,
}

impl CodecTree {
    pub fn new(runtime: Arc<BindingRuntimeContext>) -> Self {
        Self {
            runtime,
            cache: CodecCache::new(),
        }
    }

    #[must_use]
    pub fn runtime(&self) -> &Arc<BindingRuntimeContext> {
        &self.runtime
    }

    #[must_use]
    pub fn cache(&self) -> &CodecCache {
        &self.cache
    }

    pub fn structural(&self) -> StructuralCodec<'_> {
        StructuralCodec::new(&self.runtime, &self.cache)
    }

    pub fn identifiers(&self) -> IdentifierTranslator<'_> {
        IdentifierTranslator::new(&self.runtime)
    }

    /// The action (or rpc) generated as `action`.
    fn operation(&self, action: &TypeName) -> Result<&OperationSchema, CodecError> {
        self.runtime
            .operation(action)
            .ok_or_else(|| CodecError::invalid_argument(format!("{} is not an action", action)))
    }

    /// Schema path of a type of one of the given kinds.
    fn path_of_kind(&self, name: &TypeName, kinds: &[TypeKind]) -> Option<&SchemaPath> {
        let record = self.runtime.type_named(name)?;
        if !kinds.contains(&record.kind) {
            return None;
        }
        self.runtime.path_for_type(name)
    }

    fn is_kind(&self, path: &SchemaPath, kinds: &[TypeKind]) -> bool {
        self.runtime
            .type_for_path(path)
            .is_some_and(|record| kinds.contains(&record.kind))
    }
}

impl ContainerSerializer for CodecTree {
    fn serialize_container(
        &self,
        path: &SchemaPath,
        data: &DataObject,
    ) -> Result<ContainerNode, CodecError> {
        self.structural().encode_container_node(path, data)
    }
}

/// The codec entry point. Cheap to share; all methods take `&self`.
#[derive(Debug)]
pub struct BindingCodecContext {
    tree: ArcSwap<CodecTree>,
}

impl BindingCodecContext {
    pub fn new(runtime: BindingRuntimeContext) -> Self {
        Self {
            tree: ArcSwap::from_pointee(CodecTree::new(Arc::new(runtime))),
        }
    }

    /// Index `schema` and wrap the result.
    pub fn from_schema(
        schema: Arc<SchemaContext>,
        renames: Renames,
        config: CodecConfig,
    ) -> Result<Self, SchemaError> {
        let runtime = BindingRuntimeContext::build(schema, renames, &config)?;
        Ok(Self::new(runtime))
    }

    /// Replace the runtime context. Calls in flight finish against the
    /// snapshot they loaded.
    pub fn update_runtime_context(&self, runtime: BindingRuntimeContext) {
        let modules = runtime.schema().modules().len();
        self.tree.store(Arc::new(CodecTree::new(Arc::new(runtime))));
        log::info!("[codec] runtime context swapped ({} modules)", modules);
    }

    #[must_use]
    pub fn runtime(&self) -> Arc<BindingRuntimeContext> {
        self.tree.load().runtime().clone()
    }

    /// Current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<CodecTree> {
        self.tree.load_full()
    }

    /// Schema default of the leaf at `leaf` as a binding value.
    pub fn leaf_default(&self, leaf: &SchemaPath) -> Result<Option<BindingValue>, CodecError> {
        let tree = self.tree.load();
        DefaultValueMaterializer::new(tree.runtime()).leaf_default(leaf)
    }

    fn lazy_action_node(
        &self,
        action: &TypeName,
        identifier: Option<QName>,
        data: DataObject,
        output: bool,
    ) -> Result<BindingLazyContainerNode, CodecError> {
        let tree = self.tree.load_full();
        let (path, default_identifier) = {
            let op = tree.operation(action)?;
            let node = if output { &op.output } else { &op.input };
            (node.path.clone(), node.qname.clone())
        };
        let identifier = identifier.unwrap_or(default_identifier);
        Ok(BindingLazyContainerNode::new(identifier, path, data, tree))
    }
}

impl BindingNormalizedNodeSerializer for BindingCodecContext {
    fn to_yang_instance_identifier(
        &self,
        binding: &InstanceIdentifier,
    ) -> Result<YangInstanceIdentifier, CodecError> {
        self.tree.load().identifiers().to_structural(binding)
    }

    fn from_yang_instance_identifier(
        &self,
        dom: &YangInstanceIdentifier,
    ) -> Result<Option<InstanceIdentifier>, CodecError> {
        self.tree.load().identifiers().to_binding(dom)
    }

    fn to_normalized_node(
        &self,
        path: &InstanceIdentifier,
        data: &DataObject,
    ) -> Result<(YangInstanceIdentifier, NormalizedNode), CodecError> {
        let tree = self.tree.load();
        let dom = tree.identifiers().to_structural(path)?;
        let target = path
            .target_type()
            .and_then(|t| tree.runtime().path_for_type(t))
            .ok_or_else(|| CodecError::invalid_argument(format!("{} addresses no data node", path)))?;
        let node = tree.structural().encode_node(target, data)?;
        Ok((dom, node))
    }

    fn from_normalized_node(
        &self,
        path: &YangInstanceIdentifier,
        data: &NormalizedNode,
    ) -> Result<Option<(InstanceIdentifier, DataObject)>, CodecError> {
        let tree = self.tree.load();
        let Some(binding) = tree.identifiers().to_binding(path)? else {
            return Ok(None);
        };
        let Some(target) = binding
            .target_type()
            .and_then(|t| tree.runtime().path_for_type(t))
        else {
            return Ok(None);
        };
        Ok(tree
            .structural()
            .decode_node(target, data)?
            .map(|object| (binding, object)))
    }

    fn from_normalized_node_notification(
        &self,
        path: &SchemaPath,
        data: &ContainerNode,
        event_instant: Option<SystemTime>,
    ) -> Result<Option<Notification>, CodecError> {
        let tree = self.tree.load();
        if !tree.is_kind(path, &[TypeKind::Notification]) {
            return Ok(None);
        }
        let body = tree.structural().decode_container_node(path, data)?;
        let notification = Notification::new(body);
        Ok(Some(match event_instant {
            Some(instant) => notification.at(instant),
            None => notification,
        }))
    }

    fn from_normalized_node_rpc_data(
        &self,
        path: &SchemaPath,
        data: &ContainerNode,
    ) -> Result<Option<DataObject>, CodecError> {
        let tree = self.tree.load();
        if !tree.is_kind(path, &[TypeKind::Input, TypeKind::Output]) {
            return Ok(None);
        }
        tree.structural().decode_container_node(path, data).map(Some)
    }

    fn from_normalized_node_action_input(
        &self,
        action: &TypeName,
        input: &ContainerNode,
    ) -> Result<DataObject, CodecError> {
        let tree = self.tree.load();
        let path = &tree.operation(action)?.input.path;
        tree.structural().decode_container_node(path, input)
    }

    fn from_normalized_node_action_output(
        &self,
        action: &TypeName,
        output: &ContainerNode,
    ) -> Result<DataObject, CodecError> {
        let tree = self.tree.load();
        let path = &tree.operation(action)?.output.path;
        tree.structural().decode_container_node(path, output)
    }

    fn to_normalized_node_notification(
        &self,
        notification: &Notification,
    ) -> Result<ContainerNode, CodecError> {
        let tree = self.tree.load();
        let name = notification.body.type_name();
        let path = tree
            .path_of_kind(name, &[TypeKind::Notification])
            .ok_or_else(|| CodecError::invalid_argument(format!("{} is not a notification", name)))?;
        tree.structural().encode_container_node(path, &notification.body)
    }

    fn to_normalized_node_rpc_data(&self, data: &DataObject) -> Result<ContainerNode, CodecError> {
        let tree = self.tree.load();
        let name = data.type_name();
        let path = tree
            .path_of_kind(name, &[TypeKind::Input, TypeKind::Output])
            .ok_or_else(|| {
                CodecError::invalid_argument(format!("{} is not an rpc input or output", name))
            })?;
        tree.structural().encode_container_node(path, data)
    }

    fn to_normalized_node_action_input(
        &self,
        action: &TypeName,
        input: &DataObject,
    ) -> Result<ContainerNode, CodecError> {
        let tree = self.tree.load();
        let path = &tree.operation(action)?.input.path;
        tree.structural().encode_container_node(path, input)
    }

    fn to_normalized_node_action_output(
        &self,
        action: &TypeName,
        output: &DataObject,
    ) -> Result<ContainerNode, CodecError> {
        let tree = self.tree.load();
        let path = &tree.operation(action)?.output.path;
        tree.structural().encode_container_node(path, output)
    }

    fn to_lazy_normalized_node_action_input(
        &self,
        action: &TypeName,
        identifier: QName,
        input: DataObject,
    ) -> Result<BindingLazyContainerNode, CodecError> {
        self.lazy_action_node(action, Some(identifier), input, false)
    }

    fn to_lazy_normalized_node_action_output(
        &self,
        action: &TypeName,
        identifier: QName,
        output: DataObject,
    ) -> Result<BindingLazyContainerNode, CodecError> {
        self.lazy_action_node(action, Some(identifier), output, true)
    }

    fn to_lazy_normalized_node_action_input_default(
        &self,
        action: &TypeName,
        input: DataObject,
    ) -> Result<BindingLazyContainerNode, CodecError> {
        self.lazy_action_node(action, None, input, false)
    }

    fn to_lazy_normalized_node_action_output_default(
        &self,
        action: &TypeName,
        output: DataObject,
    ) -> Result<BindingLazyContainerNode, CodecError> {
        self.lazy_action_node(action, None, output, true)
    }
}
