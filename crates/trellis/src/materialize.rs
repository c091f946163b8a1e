//! The materializer: loads a template and builds the object tree it
//! describes, breadth-first, binding every node into the host.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use trellis_markup::{Element, MemoryLoader, Node, TemplateLoader};
use trellis_ui::prelude::*;

use crate::binder::{Binder, FIELD};
use crate::construct::resolve_constructor;
use crate::context::{Context, ScopeKey};
use crate::error::{Error, Result};
use crate::host::{Host, HostIndex, MarkerKind};
use crate::layout::{as_layout_manager, build_layout};
use crate::names::resolve_type_name;
use crate::token::parse_token;
use crate::types::TypeRegistry;
use crate::value::{ObjectRef, ResolvedArg, Value};

// ── Attributes ────────────────────────────────────────────────────────────

const ID: &str = "id";
const ENABLED: &str = "enabled";
const CONSTRUCTOR_ARGS: &str = "constructor-args";
const TITLE: &str = "title";
const VISIBLE: &str = "visible";
const LAYOUT: &str = "layout";
const CONSTRAINTS: &str = "constraints";
const LAYOUT_CONSTRUCTOR_ARGS: &str = "layout-constructor-args";
const PREFERRED_SIZE: &str = "preferred-size";
const EDITABLE: &str = "editable";
const ADD: &str = "add";
const BUTTON_GROUP: &str = "button-group";

// ── Config ────────────────────────────────────────────────────────────────

/// Name lookup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializerConfig {
    /// Prefixes tried, in order, for short tags and constant references.
    pub namespaces: Vec<String>,
    /// Prefixes tried, in order, for `layout` attribute values.
    pub layout_namespaces: Vec<String>,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            namespaces: vec!["trellis.widgets".into(), "trellis.layout".into()],
            layout_namespaces: vec!["trellis.layout".into(), "trellis.widgets".into()],
        }
    }
}

type Validator = dyn Fn(&Element) -> std::result::Result<(), String>;

/// Builder for [`Materializer`].
pub struct MaterializerBuilder {
    registry: Option<TypeRegistry>,
    loader: Option<Box<dyn TemplateLoader>>,
    config: MaterializerConfig,
    validator: Option<Box<Validator>>,
}

impl MaterializerBuilder {
    /// Types to materialize. Defaults to [`TypeRegistry::builtin`].
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Where templates come from. Defaults to an empty [`MemoryLoader`].
    pub fn loader(mut self, loader: impl TemplateLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Append a namespace for short tags.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespaces.push(namespace.into());
        self
    }

    /// Append a namespace for layout names.
    pub fn layout_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.layout_namespaces.push(namespace.into());
        self
    }

    pub fn config(mut self, config: MaterializerConfig) -> Self {
        self.config = config;
        self
    }

    /// Check each element before it is materialized. Every element is
    /// accepted when no validator is set.
    pub fn validator(mut self, f: impl Fn(&Element) -> std::result::Result<(), String> + 'static) -> Self {
        self.validator = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Materializer {
        Materializer {
            registry: self.registry.unwrap_or_else(TypeRegistry::builtin),
            loader: self.loader.unwrap_or_else(|| Box::new(MemoryLoader::new())),
            config: self.config,
            validator: self.validator,
        }
    }
}

// ── Materializer ──────────────────────────────────────────────────────────

/// Turns templates into live objects.
///
/// # Example
/// ```rust
/// use trellis::host::{FieldDecl, Fields, Host, HostSchema};
/// use trellis::types::{Constructor, TypeInfo, FRAME};
/// use trellis::{Materializer, Object, ObjectRef, TypeRegistry, Value};
/// use trellis_markup::MemoryLoader;
/// use trellis_ui::{Component, WidgetKind};
/// use std::any::Any;
/// use std::rc::Rc;
///
/// struct Hello {
///     schema: HostSchema,
///     fields: Fields,
///     frame: Component,
/// }
///
/// impl Object for Hello {
///     fn type_name(&self) -> &str { "demo.Hello" }
///     fn as_any(&self) -> &dyn Any { self }
///     fn field(&self, name: &str) -> Option<Value> { self.fields.get(&self.schema, name) }
///     fn as_component(&self) -> Option<Component> { Some(self.frame.clone()) }
///     fn as_host(&self) -> Option<&dyn Host> { Some(self) }
/// }
///
/// impl Host for Hello {
///     fn schema(&self) -> &HostSchema { &self.schema }
///     fn set_field(&self, name: &str, value: Value) -> bool { self.fields.set(&self.schema, name, value) }
/// }
///
/// let registry = TypeRegistry::builtin().with(
///     TypeInfo::new("demo.Hello").extends(FRAME).template("hello").constructor(Constructor::new(
///         Vec::<String>::new(),
///         |_| {
///             Ok(Rc::new(Hello {
///                 schema: HostSchema::new("demo.Hello").field(FieldDecl::new("button", "Button")),
///                 fields: Fields::new(),
///                 frame: Component::new("demo.Hello", WidgetKind::Frame),
///             }) as ObjectRef)
///         },
///     )),
/// );
/// let loader = MemoryLoader::new().with("hello", r#"<frame title="Hi"><button field="button">Go</button></frame>"#);
///
/// let m = Materializer::builder().registry(registry).loader(loader).build();
/// let hello = m.create("demo.Hello", &[]).unwrap();
/// let button = hello.field("button").and_then(|v| v.as_component()).unwrap();
/// assert_eq!(button.text().as_deref(), Some("Go"));
/// ```
pub struct Materializer {
    registry: TypeRegistry,
    loader: Box<dyn TemplateLoader>,
    config: MaterializerConfig,
    validator: Option<Box<Validator>>,
}

/// Per-template state shared by every node of one instantiation.
struct Instance<'a> {
    binder: Binder<'a>,
    host: &'a ObjectRef,
    scope: ScopeKey,
}

impl Materializer {
    pub fn builder() -> MaterializerBuilder {
        MaterializerBuilder {
            registry: None,
            loader: None,
            config: MaterializerConfig::default(),
            validator: None,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MaterializerConfig {
        &self.config
    }

    /// Instantiate the host type `type_name` and build its template into it.
    ///
    /// Non-empty `args` replace the template root's `constructor-args`.
    pub fn create(&self, type_name: &str, args: &[Value]) -> Result<ObjectRef> {
        self.create_in(&mut Context::new(), type_name, args)
    }

    /// [`create`](Self::create) sharing ids and groups with `ctx`.
    pub fn create_in(&self, ctx: &mut Context, type_name: &str, args: &[Value]) -> Result<ObjectRef> {
        self.instantiate(ctx, type_name, programmatic(args))
    }

    /// Build the template of an existing host's type and return its root.
    /// The root element is constructed like any other node and bound into
    /// the host.
    pub fn render(&self, host: &ObjectRef, args: &[Value]) -> Result<Component> {
        self.render_in(&mut Context::new(), host, args)
    }

    /// [`render`](Self::render) sharing ids and groups with `ctx`.
    pub fn render_in(&self, ctx: &mut Context, host_obj: &ObjectRef, args: &[Value]) -> Result<Component> {
        let ty = self.registry.canonical(host_obj.type_name()).to_string();
        let host = host_obj.as_host().ok_or_else(|| Error::NotAHost { ty: ty.clone() })?;
        let root = self.load(&ty)?;
        let index = HostIndex::build(host.schema())?;
        log::debug!("rendering {ty}");

        let inst = Instance { binder: Binder::new(&self.registry, host, &index), host: host_obj, scope: ctx.open_scope() };
        let (object, component) = self.build_element(ctx, &inst, &root, programmatic(args))?;
        self.bind(ctx, &inst, &root, &object, &component)?;
        self.traverse(ctx, &inst, &root, &object)?;
        self.finish(&root, host, &component);
        Ok(component)
    }

    fn instantiate(&self, ctx: &mut Context, type_name: &str, args: Vec<ResolvedArg>) -> Result<ObjectRef> {
        let ty = self.registry.canonical(type_name).to_string();
        let root = self.load(&ty)?;
        log::debug!("creating {ty}");

        let args = if args.is_empty() { self.parse_args(ctx, None, &root)? } else { args };
        let host_obj = self.construct(&ty, &args, &root)?;
        let host = host_obj.as_host().ok_or_else(|| Error::NotAHost { ty: ty.clone() })?;
        let index = HostIndex::build(host.schema())?;
        let component = component_of(&host_obj, &root)?;
        self.register_id(ctx, &root, &host_obj)?;

        self.configure(ctx, &root, &host_obj, &component)?;

        let inst = Instance { binder: Binder::new(&self.registry, host, &index), host: &host_obj, scope: ctx.open_scope() };
        self.traverse(ctx, &inst, &root, &host_obj)?;
        self.finish(&root, host, &component);
        Ok(host_obj)
    }

    fn load(&self, ty: &str) -> Result<Element> {
        let info = self.registry.get(ty).ok_or_else(|| Error::UnregisteredType { ty: ty.to_string() })?;
        let template = info.template.as_deref().ok_or_else(|| Error::NoTemplate { ty: ty.to_string() })?;
        let doc = self.loader.load(template).map_err(|source| Error::Load { ty: ty.to_string(), source })?;
        self.validate(&doc.root)?;
        Ok(doc.root)
    }

    fn validate(&self, element: &Element) -> Result<()> {
        match &self.validator {
            Some(check) => check(element).map_err(|message| Error::Rejected { message, element: element.to_string() }),
            None => Ok(()),
        }
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    fn traverse(&self, ctx: &mut Context, inst: &Instance<'_>, root: &Element, root_obj: &ObjectRef) -> Result<()> {
        let mut queue = VecDeque::from([(root, root_obj.clone())]);
        while let Some((element, owner)) = queue.pop_front() {
            if element.text().is_some() {
                continue;
            }
            let parent = component_of(&owner, element)?;
            for node in &element.children {
                let child = match node {
                    Node::Element(child) => child,
                    _ if node.is_blank_text() => continue,
                    Node::Text(text) => {
                        return Err(Error::StrayText { text: text.trim().to_string(), element: element.to_string() });
                    }
                };
                self.validate(child)?;
                let (object, component) = self.build_element(ctx, inst, child, Vec::new())?;
                if child.attr_bool(ADD).unwrap_or(true) {
                    let constraint = self.constraint(ctx, inst, child)?;
                    parent
                        .add(&component, constraint)
                        .map_err(|source| Error::Toolkit { element: child.to_string(), source })?;
                }
                self.bind(ctx, inst, child, &object, &component)?;
                queue.push_back((child, object));
            }
        }
        Ok(())
    }

    fn finish(&self, root: &Element, host: &dyn Host, component: &Component) {
        if component.kind().is_window_like() {
            component.pack();
        }
        if let Some(visible) = root.attr_bool(VISIBLE) {
            component.set_visible(visible);
        }
        if let Some(hook) = host.post_setup() {
            hook.after_create();
        }
        log::debug!("finished {}", host.schema().ty);
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Construct the object for `element`, register its id and apply its
    /// attributes. Non-empty `args` replace the element's `constructor-args`.
    fn build_element(
        &self,
        ctx: &mut Context,
        inst: &Instance<'_>,
        element: &Element,
        args: Vec<ResolvedArg>,
    ) -> Result<(ObjectRef, Component)> {
        let name = resolve_type_name(&self.registry, &self.config.namespaces, &element.name)
            .ok_or_else(|| Error::UnknownType { name: element.name.clone(), element: element.to_string() })?;
        let ty = self.concrete_type(inst, element, name)?;
        let args = if args.is_empty() { self.parse_args(ctx, Some(inst.host), element)? } else { args };

        let object = if self.registry.get(&ty).is_some_and(|t| t.template.is_some()) {
            log::debug!("<{}> is templated, materializing {ty}", element.name);
            self.instantiate(ctx, &ty, args)?
        } else {
            self.construct(&ty, &args, element)?
        };
        let component = component_of(&object, element)?;
        self.register_id(ctx, element, &object)?;
        self.configure(ctx, element, &object, &component)?;
        log::debug!("built {} for <{}>", object.type_name(), element.name);
        Ok((object, component))
    }

    /// Abstract types stand for the declared type of the fields the element
    /// binds to.
    fn concrete_type(&self, inst: &Instance<'_>, element: &Element, ty: String) -> Result<String> {
        if !self.registry.get(&ty).is_some_and(|t| t.is_abstract) {
            return Ok(ty);
        }
        let bindings = inst.binder.find_associated(element, MarkerKind::Component, FIELD)?;
        if bindings.is_empty() {
            return Err(Error::NoBoundField { ty, element: element.to_string() });
        }
        let declared: BTreeSet<&str> = bindings.iter().filter_map(|b| inst.binder.declared_type(&b.field)).collect();
        let mut declared = declared.into_iter();
        let (Some(concrete), None) = (declared.next(), declared.next()) else {
            return Err(Error::MixedFieldTypes { ty, element: element.to_string() });
        };
        if !self.registry.is_subtype(concrete, &ty) {
            return Err(Error::NotADescendant { concrete: concrete.to_string(), marker: ty, element: element.to_string() });
        }
        log::trace!("<{}> resolved to {concrete} through its fields", element.name);
        Ok(concrete.to_string())
    }

    fn parse_args(&self, ctx: &Context, context: Option<&ObjectRef>, element: &Element) -> Result<Vec<ResolvedArg>> {
        element
            .attr_list(CONSTRUCTOR_ARGS)
            .into_iter()
            .map(|token| {
                parse_token(&self.registry, context, None, ctx.ids(), &self.config.namespaces, token)
                    .map_err(|source| Error::Token { element: element.to_string(), source })
            })
            .collect()
    }

    fn construct(&self, ty: &str, args: &[ResolvedArg], element: &Element) -> Result<ObjectRef> {
        let arg_types: Vec<String> = args.iter().map(|a| a.ty.clone()).collect();
        let ctor = resolve_constructor(&self.registry, ty, &arg_types).ok_or_else(|| Error::NoConstructor {
            ty: ty.to_string(),
            args: arg_types.join(", "),
            element: element.to_string(),
        })?;
        let values: Vec<Value> = args.iter().map(|a| a.value.clone()).collect();
        ctor.invoke(&values).map_err(|message| Error::Construct {
            ty: ty.to_string(),
            message,
            element: element.to_string(),
        })
    }

    fn register_id(&self, ctx: &mut Context, element: &Element, object: &ObjectRef) -> Result<()> {
        let Some(id) = element.attr(ID) else {
            return Ok(());
        };
        ctx.register(id, object.clone()).map_err(|first| Error::DuplicateId {
            id: id.to_string(),
            first,
            element: element.to_string(),
        })
    }

    // ── Attributes ────────────────────────────────────────────────────────

    fn configure(&self, ctx: &Context, element: &Element, object: &ObjectRef, component: &Component) -> Result<()> {
        if let Some(enabled) = element.attr_bool(ENABLED) {
            component.set_enabled(enabled);
        }
        if let Some(title) = element.attr(TITLE) {
            component
                .set_title(title)
                .map_err(|_| Error::InvalidTitle { ty: object.type_name().to_string(), element: element.to_string() })?;
        }
        if let Some(layout) = element.attr(LAYOUT) {
            let layout_error = |source| Error::Layout { element: element.to_string(), source };
            let args = element.attr_list(LAYOUT_CONSTRUCTOR_ARGS);
            let built = build_layout(&self.registry, ctx.ids(), &self.config.layout_namespaces, layout, object, &args)
                .and_then(|l| as_layout_manager(&l))
                .map_err(layout_error)?;
            component.set_layout(built).map_err(|source| Error::Toolkit { element: element.to_string(), source })?;
        }
        if let Some(text) = element.text() {
            component
                .set_text(text)
                .map_err(|_| Error::InvalidText { ty: object.type_name().to_string(), element: element.to_string() })?;
        }
        if let Some(size) = element.attr(PREFERRED_SIZE) {
            let size = parse_size(size).ok_or_else(|| Error::InvalidPreferredSize {
                value: size.to_string(),
                element: element.to_string(),
            })?;
            component.set_preferred_size(size);
        }
        if let Some(editable) = element.attr_bool(EDITABLE) {
            if component.kind().is_text_input_like() {
                component
                    .set_editable(editable)
                    .map_err(|source| Error::Toolkit { element: element.to_string(), source })?;
            } else {
                log::debug!("editable ignored on {}", object.type_name());
            }
        }
        if let Some(visible) = element.attr_bool(VISIBLE) {
            component.set_visible(visible);
        }
        Ok(())
    }

    fn constraint(&self, ctx: &Context, inst: &Instance<'_>, element: &Element) -> Result<Option<Constraint>> {
        let Some(token) = element.attr(CONSTRAINTS) else {
            return Ok(None);
        };
        let arg = parse_token(&self.registry, Some(inst.host), None, ctx.ids(), &self.config.namespaces, token)
            .map_err(|source| Error::Token { element: element.to_string(), source })?;
        Ok(match arg.value {
            Value::Null => None,
            Value::Str(s) => Some(Constraint::Name(s)),
            Value::Int(i) => Some(Constraint::Index(i)),
            Value::Bool(b) => Some(Constraint::Object(Rc::new(b))),
            Value::Object(o) => Some(Constraint::Object(Rc::new(o))),
        })
    }

    // ── Binding ───────────────────────────────────────────────────────────

    fn bind(
        &self,
        ctx: &mut Context,
        inst: &Instance<'_>,
        element: &Element,
        object: &ObjectRef,
        component: &Component,
    ) -> Result<()> {
        inst.binder.bind_fields(element, object)?;
        inst.binder.bind_listeners(element, object, component)?;
        inst.binder.bind_action(element, component)?;
        if let Some(name) = element.attr(BUTTON_GROUP) {
            if !component.kind().is_button_like() {
                return Err(Error::InvalidButtonGroup {
                    ty: object.type_name().to_string(),
                    element: element.to_string(),
                });
            }
            ctx.group(inst.scope, name)
                .add(component)
                .map_err(|source| Error::Toolkit { element: element.to_string(), source })?;
        }
        inst.binder.bind_renderer(element, component)
    }
}

impl fmt::Debug for Materializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Materializer")
            .field("config", &self.config)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

fn programmatic(args: &[Value]) -> Vec<ResolvedArg> {
    args.iter().map(|v| ResolvedArg::new(v.type_name(), v.clone())).collect()
}

fn component_of(object: &ObjectRef, element: &Element) -> Result<Component> {
    object.as_component().ok_or_else(|| Error::NotAComponent {
        ty: object.type_name().to_string(),
        element: element.to_string(),
    })
}

/// `"W,H"`.
fn parse_size(s: &str) -> Option<Dimension> {
    let (w, h) = s.split_once(',')?;
    Some(Dimension::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
}
