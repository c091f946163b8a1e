//! Hosts and registries shared by the unit tests.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_ui::{Component, WidgetKind};

use crate::host::{Fields, Host, HostSchema, PostSetup};
use crate::types::{Constructor, TypeInfo, TypeRegistry};
use crate::value::{Object, ObjectRef, Value};

pub(crate) struct TestHost {
    schema: HostSchema,
    fields: Fields,
    root: Option<Component>,
    pub setups: Cell<usize>,
    pub args: RefCell<Vec<Value>>,
}

impl TestHost {
    pub fn new(schema: HostSchema, root: Option<Component>) -> Self {
        Self { schema, fields: Fields::new(), root, setups: Cell::new(0), args: RefCell::new(Vec::new()) }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields = self.fields.with(field, value);
        self
    }

    pub fn component(&self, field: &str) -> Option<Component> {
        self.fields.component(field)
    }

    pub fn value(&self, field: &str) -> Option<Value> {
        self.fields.get(&self.schema, field)
    }
}

impl Object for TestHost {
    fn type_name(&self) -> &str {
        &self.schema.ty
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(&self.schema, name)
    }

    fn as_component(&self) -> Option<Component> {
        self.root.clone()
    }

    fn as_host(&self) -> Option<&dyn Host> {
        Some(self)
    }
}

impl Host for TestHost {
    fn schema(&self) -> &HostSchema {
        &self.schema
    }

    fn set_field(&self, name: &str, value: Value) -> bool {
        self.fields.set(&self.schema, name, value)
    }

    fn post_setup(&self) -> Option<&dyn PostSetup> {
        Some(self)
    }
}

impl PostSetup for TestHost {
    fn after_create(&self) {
        self.setups.set(self.setups.get() + 1);
    }
}

/// Register a host type built from `schema` on a component of `kind`. The
/// constructors take no arguments or a single string.
pub(crate) fn host_type(
    name: &'static str,
    superclass: &str,
    kind: WidgetKind,
    template: &str,
    schema: impl Fn() -> HostSchema + Clone + 'static,
) -> TypeInfo {
    let with_args = schema.clone();
    TypeInfo::new(name)
        .extends(superclass)
        .template(template)
        .constructor(Constructor::new(Vec::<String>::new(), move |_| {
            Ok(Rc::new(TestHost::new(schema(), Some(Component::new(name, kind)))) as ObjectRef)
        }))
        .constructor(Constructor::new([crate::types::STRING], move |args| {
            let host = TestHost::new(with_args(), Some(Component::new(name, kind)));
            host.args.replace(args.to_vec());
            Ok(Rc::new(host) as ObjectRef)
        }))
}

pub(crate) fn registry_with(types: impl IntoIterator<Item = TypeInfo>) -> TypeRegistry {
    types.into_iter().fold(TypeRegistry::builtin(), TypeRegistry::with)
}

pub(crate) fn host_of(obj: &ObjectRef) -> &TestHost {
    obj.as_any().downcast_ref::<TestHost>().expect("not a test host")
}
