//! Selling resources to the merchant.

use driftmine_ecs::query::query1;
use driftmine_ecs::{EcsError, Entity, World};

use crate::components::{ResourceKind, RESOURCE_SCALE, RESOURCES, SELL_PRICES};
use crate::selectors::find_user_resource;

/// Player-invoked sale of up to `amount_units` whole units of `kind`.
///
/// Price comes from the merchant's fixed price list (first matching entry).
/// Sells `min(held, requested)` and credits `sold × price` to the user's money
/// stock. A zero price, zero holding, or missing money stock is a no-op, not
/// an error. Returns the fixed-point amount actually sold.
pub fn sell_resource(
    world: &mut World,
    user: Entity,
    kind: ResourceKind,
    amount_units: i64,
) -> Result<i64, EcsError> {
    let mut price = 0;
    for (_, sell) in query1(world, &SELL_PRICES)? {
        if sell.resource == kind {
            price = sell.price_per_unit;
            break;
        }
    }
    if price <= 0 {
        return Ok(0);
    }

    let Some(stock_entity) = find_user_resource(world, user, kind)? else {
        return Ok(0);
    };
    let requested = amount_units.max(0) * RESOURCE_SCALE;
    let held = world
        .get(&RESOURCES, stock_entity)?
        .map_or(0, |stock| stock.amount);
    let sold = held.min(requested);
    if sold <= 0 {
        return Ok(0);
    }

    if let Some(stock) = world.get_mut(&RESOURCES, stock_entity)? {
        stock.amount -= sold;
    }
    if let Some(money_entity) = find_user_resource(world, user, ResourceKind::Money)? {
        if let Some(money) = world.get_mut(&RESOURCES, money_entity)? {
            money.amount += sold * price;
        }
    }
    log::debug!("{} sold {} of {:?} at {}", user, sold, kind, price);
    Ok(sold)
}
