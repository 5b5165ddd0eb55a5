//! The host's exposed type: one operation per capability, backed by a
//! [`SettingsStore`].

use crate::args::Args;
use crate::store::{ControlKind, SettingsStore};
use modsetting_binding::{
    CapabilityName, ExposedType, HostFault, KeyCode, Operation, ParamType, Value, ValueType,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Largest title scale a group may use, relative to the mod title.
const MAX_GROUP_SCALE: f32 = 0.9;

/// Plain operation whose body reads its arguments through [`Args`].
fn operation<F>(
    store: &Arc<SettingsStore>,
    capability: CapabilityName,
    params: Vec<ParamType>,
    f: F,
) -> Operation
where
    F: Fn(&SettingsStore, &mut Args) -> Result<Value, HostFault> + Send + Sync + 'static,
{
    let store = Arc::clone(store);
    let name = capability.as_str();
    Operation::new(name, params, move |values| {
        f(&store, &mut Args::new(name, values))
    })
}

/// Generic operation whose body reads its arguments through [`Args`].
fn generic_operation<F>(
    store: &Arc<SettingsStore>,
    capability: CapabilityName,
    params: Vec<ParamType>,
    f: F,
) -> Operation
where
    F: Fn(&SettingsStore, ValueType, &mut Args) -> Result<Value, HostFault>
        + Send
        + Sync
        + 'static,
{
    let store = Arc::clone(store);
    let name = capability.as_str();
    Operation::generic(name, params, move |ty, values| {
        f(&store, ty, &mut Args::new(name, values))
    })
}

/// Leading parameters shared by every control: owner, key, description.
fn control_params(rest: impl IntoIterator<Item = ParamType>) -> Vec<ParamType> {
    let mut params = vec![ParamType::Descriptor, ParamType::Str, ParamType::Str];
    params.extend(rest);
    params
}

/// Every operation of the host, in declaration order.
pub(crate) fn operations(store: &Arc<SettingsStore>) -> Vec<Operation> {
    use ParamType::{Action, Bool, Descriptor, Float, Generic, Int, Str};

    vec![
        operation(
            store,
            CapabilityName::AddDropDownList,
            control_params([ParamType::list(Str), Str, ParamType::callback(Str)]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let options = args.strings()?;
                let default = args.string()?;
                let on_change = args.callback()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::Dropdown { options },
                    Value::Str(default),
                    on_change,
                );
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::AddSlider,
            control_params([Float, ParamType::Vec2, ParamType::callback(Float), Int, Int]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let default = args.float()?;
                let range = args.vec2()?;
                let on_change = args.callback()?;
                let decimal_places = args.int()?;
                let char_limit = args.int()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::Slider {
                        range,
                        decimal_places,
                        char_limit,
                    },
                    Value::Float(default),
                    on_change,
                );
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::AddSlider,
            control_params([Int, Int, Int, ParamType::callback(Int), Int]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let default = args.int()?;
                let min = args.int()?;
                let max = args.int()?;
                let on_change = args.callback()?;
                let char_limit = args.int()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::IntSlider {
                        min,
                        max,
                        char_limit,
                    },
                    Value::Int(default),
                    on_change,
                );
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::AddToggle,
            control_params([Bool, ParamType::callback(Bool)]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let enabled = args.bool()?;
                let on_change = args.callback()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::Toggle,
                    Value::Bool(enabled),
                    on_change,
                );
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::AddKeybinding,
            control_params([ParamType::KeyCode, ParamType::callback(ParamType::KeyCode)]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let current = args.key_code()?;
                let on_change = args.callback()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::Keybinding {
                        default: KeyCode::None,
                    },
                    Value::KeyCode(current),
                    on_change,
                );
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::AddKeybindingWithDefault,
            control_params([
                ParamType::KeyCode,
                ParamType::KeyCode,
                ParamType::callback(ParamType::KeyCode),
            ]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let current = args.key_code()?;
                let default = args.key_code()?;
                let on_change = args.callback()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::Keybinding { default },
                    Value::KeyCode(current),
                    on_change,
                );
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::AddInput,
            control_params([Str, Int, ParamType::callback(Str)]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let default = args.string()?;
                let char_limit = args.int()?;
                let on_change = args.callback()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::Input { char_limit },
                    Value::Str(default),
                    on_change,
                );
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::AddButton,
            control_params([Str, Action]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let label = args.string()?;
                let on_click = args.callback()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::Button { label },
                    Value::Null,
                    on_click,
                );
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::AddGroup,
            control_params([ParamType::list(Str), Float, Bool, Bool]),
            |store, args| {
                let (owner, key, description) = (args.owner()?, args.string()?, args.string()?);
                let members = args.strings()?;
                let scale = args.float()?.min(MAX_GROUP_SCALE);
                let top_insert = args.bool()?;
                let open = args.bool()?;
                store.add_control(
                    &owner,
                    &key,
                    description,
                    ControlKind::Group {
                        members,
                        scale,
                        top_insert,
                        open,
                    },
                    Value::Null,
                    None,
                );
                Ok(Value::Null)
            },
        ),
        generic_operation(
            store,
            CapabilityName::GetValue,
            vec![Descriptor, Str, ParamType::callback(Generic)],
            |store, ty, args| {
                let owner = args.owner()?;
                let key = args.string()?;
                let callback = args.callback()?;
                let value = store
                    .value(&owner.name, &key)
                    .filter(|value| value.value_type() == Some(ty));
                if let (Some(value), Some(callback)) = (value, callback) {
                    callback.call(value);
                }
                Ok(Value::Null)
            },
        ),
        generic_operation(
            store,
            CapabilityName::SetValue,
            vec![Descriptor, Str, Generic, ParamType::callback(Bool)],
            |store, ty, args| {
                let owner = args.owner()?;
                let key = args.string()?;
                let value = args.value()?;
                let on_done = args.callback()?;

                let applied = if value.value_type() == Some(ty) {
                    store.apply(&owner.name, &key, value.clone())
                } else {
                    None
                };
                let success = applied.is_some();
                if let Some(Some(on_change)) = applied {
                    on_change.call(value);
                }
                if let Some(on_done) = on_done {
                    on_done.call(Value::Bool(success));
                }
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::RemoveUI,
            vec![Descriptor, Str, ParamType::callback(Bool)],
            |store, args| {
                let owner = args.owner()?;
                let key = args.string()?;
                let on_done = args.callback()?;
                let removed = store.remove(&owner.name, &key);
                if let Some(on_done) = on_done {
                    on_done.call(Value::Bool(removed));
                }
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::RemoveMod,
            vec![Descriptor, ParamType::callback(Bool)],
            |store, args| {
                let owner = args.owner()?;
                let on_done = args.callback()?;
                let removed = store.remove_owner(&owner.name);
                if let Some(on_done) = on_done {
                    on_done.call(Value::Bool(removed));
                }
                Ok(Value::Null)
            },
        ),
        operation(
            store,
            CapabilityName::HasConfig,
            vec![Descriptor],
            |store, args| {
                let owner = args.owner()?;
                Ok(Value::Bool(store.has_config(&owner.name)))
            },
        ),
        generic_operation(
            store,
            CapabilityName::GetSavedValue,
            vec![Descriptor, Str],
            |store, ty, args| {
                let owner = args.owner()?;
                let key = args.string()?;
                Ok(store
                    .saved_value_of(&owner.name, &key, ty)
                    .unwrap_or(Value::Null))
            },
        ),
    ]
}

/// Assemble the exposed type.
///
/// `omitted` capabilities are left out entirely; `overrides` replace every
/// operation of the same name.
pub(crate) fn exposed_type(
    type_name: &str,
    store: &Arc<SettingsStore>,
    version: Option<Value>,
    omitted: &HashSet<CapabilityName>,
    overrides: Vec<Operation>,
) -> ExposedType {
    let overridden: HashSet<String> = overrides.iter().map(|op| op.name().to_string()).collect();

    let mut ty = ExposedType::new(type_name);
    for op in operations(store) {
        let omit = CapabilityName::parse(op.name()).is_ok_and(|cap| omitted.contains(&cap));
        if omit || overridden.contains(op.name()) {
            continue;
        }
        ty = ty.with_operation(op);
    }
    for op in overrides {
        ty = ty.with_operation(op);
    }

    match version {
        Some(version) => ty.with_field("Version", version),
        None => ty,
    }
}
