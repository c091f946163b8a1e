//! Constructor selection by argument types.

use crate::types::{Constructor, TypeRegistry};

/// Pick the constructor of `ty` that best fits `arg_types`.
///
/// An exact signature match wins outright. Otherwise every constructor of the
/// same arity whose parameters are all reachable from the arguments by
/// [`TypeRegistry::distance`] is ranked by its distance vector, compared from
/// the first argument forward: the first argument is the most significant.
/// Ties go to the constructor declared first.
pub fn resolve_constructor<'r>(
    registry: &'r TypeRegistry,
    ty: &str,
    arg_types: &[String],
) -> Option<&'r Constructor> {
    let info = registry.get(registry.canonical(ty))?;
    let args: Vec<&str> = arg_types.iter().map(|a| registry.canonical(a)).collect();

    if let Some(exact) = info
        .constructors
        .iter()
        .find(|c| c.params.len() == args.len() && c.params.iter().zip(&args).all(|(p, a)| registry.canonical(p) == *a))
    {
        return Some(exact);
    }

    info.constructors
        .iter()
        .filter(|c| c.params.len() == args.len())
        .filter_map(|c| {
            let distances = args
                .iter()
                .zip(&c.params)
                .map(|(a, p)| registry.distance(a, p))
                .collect::<Option<Vec<usize>>>()?;
            Some((c, distances))
        })
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(c, distances)| {
            log::trace!("{ty}({}) -> {c:?}, distances {distances:?}", arg_types.join(", "));
            c
        })
}
