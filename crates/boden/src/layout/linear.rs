//! Linear layout: children stacked along one axis.
//!
//! Children are placed one after another along the primary axis, each
//! separated by its own margins. Across the stack a child is positioned by
//! its alignment on the secondary axis. Children whose primary alignment is
//! `Expand` share the space left over by the others.

use std::sync::Arc;

use boden_core::{BodenError, COMPONENT_NONE, Margin, Result, RoundType, Size};

use super::ViewLayout;
use super::virtual_axis::{
    Orientation, VirtualAlignment, VirtualMargin, VirtualPoint, VirtualRect, VirtualSize,
};
use crate::view::View;

/// The orientation of a linear layout view.
pub fn orientation_of(view: &View) -> Result<Orientation> {
    view.kind()
        .as_linear_layout()
        .map(|state| Orientation::from_horizontal(state.horizontal.get()))
        .ok_or_else(|| {
            BodenError::programming(format!(
                "{} is not a linear layout view",
                view.kind().name()
            ))
        })
}

/// Remove `padding` from the finite axes of `space`, flooring at zero.
pub fn padded_available_space(padding: Margin, space: Size) -> Size {
    let mut padded = space;
    if padded.width.is_finite() {
        padded.width = (padded.width - padding.horizontal()).max(0.0);
    }
    if padded.height.is_finite() {
        padded.height = (padded.height - padding.vertical()).max(0.0);
    }
    padded
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Measure,
    Layout,
}

struct ChildBounds {
    /// Bounds after rounding up.
    adjusted: VirtualRect,
    unadjusted: VirtualRect,
    /// Size the child asked for, capped to its space during layout.
    requested: VirtualSize,
}

/// Measure one child at `position` within `secondary_space` and round its
/// bounds up. `secondary_space` is the container's extent without its
/// padding removed.
fn child_bounds(
    child: &Arc<View>,
    orientation: Orientation,
    mut position: VirtualPoint,
    margin: VirtualMargin,
    secondary_space: f64,
    phase: Phase,
) -> Result<ChildBounds> {
    let mut available = VirtualSize::new(COMPONENT_NONE, secondary_space);
    if available.secondary.is_finite() {
        available.secondary = (available.secondary - margin.secondary()).max(0.0);
    }

    let mut size = VirtualSize::from_size(
        child.calc_preferred_size(available.to_size(orientation))?,
        orientation,
    );

    // While measuring, a child may ask for more than there is.
    if phase == Phase::Layout {
        let (_, alignment) = VirtualAlignment::of_view(
            child.horizontal_alignment(),
            child.vertical_alignment(),
            orientation,
        );
        size.apply_maximum(available);
        if available.secondary.is_finite() {
            position.secondary += (available.secondary - size.secondary) * alignment.offset_factor();
            if alignment == VirtualAlignment::Expand && size.secondary < available.secondary {
                size.secondary = available.secondary;
            }
        }
    }

    let unadjusted = VirtualRect::from_position_size(position, size);
    let adjusted = VirtualRect::from_rect(
        child.adjust_bounds(unadjusted.to_rect(orientation), RoundType::Up, RoundType::Up),
        orientation,
    );
    Ok(ChildBounds {
        adjusted,
        unadjusted,
        requested: size,
    })
}

/// Preferred size of a linear layout view for `available_space`.
pub fn calc_container_preferred_size(view: &Arc<View>, available_space: Size) -> Result<Size> {
    let orientation = orientation_of(view)?;
    let epsilon = view.context().layout_epsilon();
    let padding_dips = view.padding_dips()?;
    let padding = VirtualMargin::from_margin(padding_dips, orientation);

    let clipped = available_space.with_maximum(view.preferred_size_maximum());
    let clipped_secondary = VirtualSize::from_size(clipped, orientation).secondary;
    let mut padded = VirtualSize::from_size(padded_available_space(padding_dips, clipped), orientation);

    let mut position = VirtualPoint::new(padding.primary_near, 0.0);
    let mut max_secondary_with_margin: f64 = 0.0;

    for child in view.child_views() {
        let margin = VirtualMargin::from_margin(child.margin_dips()?, orientation);
        position.primary += margin.primary_near;
        position.secondary = padding.secondary_near + margin.secondary_near;

        // Children measure against the clipped space; padding only decides
        // whether the container has to grow.
        let bounds = child_bounds(&child, orientation, position, margin, clipped_secondary, Phase::Measure)?;
        let secondary_with_margin = bounds.adjusted.secondary_size + margin.secondary();

        if clipped_secondary.is_finite() && secondary_with_margin - padded.secondary > epsilon {
            padded.secondary = secondary_with_margin;
        }
        max_secondary_with_margin = max_secondary_with_margin.max(secondary_with_margin);

        position.primary = bounds.adjusted.primary_end() + margin.primary_far;
    }

    let preferred = VirtualSize::new(
        position.primary + padding.primary_far,
        max_secondary_with_margin + padding.secondary(),
    )
    .to_size(orientation)
    .with_minimum(view.preferred_size_minimum())
    .with_maximum(view.preferred_size_maximum());
    Ok(preferred)
}

/// Child bounds of a linear layout view of size `container_size`.
pub fn calc_container_layout(view: &Arc<View>, container_size: Size) -> Result<ViewLayout> {
    if !container_size.is_finite() {
        return Err(BodenError::programming(format!(
            "linear layout needs a finite container size, got {container_size}"
        )));
    }
    let orientation = orientation_of(view)?;
    let epsilon = view.context().layout_epsilon();
    let padding_dips = view.padding_dips()?;
    let padding = VirtualMargin::from_margin(padding_dips, orientation);

    let container = VirtualSize::from_size(container_size, orientation);
    let padded = VirtualSize::from_size(padded_available_space(padding_dips, container_size), orientation);

    let children = view.child_views();
    let mut layout = ViewLayout::new();
    let mut position = VirtualPoint::new(padding.primary_near, 0.0);
    let mut expanding = Vec::with_capacity(children.len());
    let mut fixed_space = 0.0;

    for child in &children {
        let margin = VirtualMargin::from_margin(child.margin_dips()?, orientation);
        position.primary += margin.primary_near;
        position.secondary = padding.secondary_near + margin.secondary_near;

        let bounds = child_bounds(child, orientation, position, margin, container.secondary, Phase::Layout)?;
        let mut adjusted = bounds.adjusted;

        // Rounding up may overflow the padded space; round the size down then.
        if adjusted.secondary_size + margin.secondary() - padded.secondary > epsilon {
            adjusted = VirtualRect::from_rect(
                child.adjust_bounds(
                    bounds.unadjusted.to_rect(orientation),
                    RoundType::Up,
                    RoundType::Down,
                ),
                orientation,
            );
        }

        // A child that lost secondary extent may need more primary extent,
        // for example a label wrapping into more lines.
        if (adjusted.secondary_size - bounds.unadjusted.secondary_size).abs() > epsilon
            && adjusted.secondary_size < bounds.requested.secondary
        {
            let constrained = VirtualSize::new(COMPONENT_NONE, adjusted.secondary_size);
            let remeasured = VirtualSize::from_size(
                child.calc_preferred_size(constrained.to_size(orientation))?,
                orientation,
            );
            if remeasured.primary != adjusted.primary_size {
                adjusted.primary_size = remeasured.primary;
                adjusted = VirtualRect::from_rect(
                    child.adjust_bounds(adjusted.to_rect(orientation), RoundType::Up, RoundType::Down),
                    orientation,
                );
            }
        }

        layout.set_bounds(child, adjusted.to_rect(orientation));

        let start = position.primary;
        position.primary = adjusted.primary_end() + margin.primary_far;

        let (primary_alignment, _) = VirtualAlignment::of_view(
            child.horizontal_alignment(),
            child.vertical_alignment(),
            orientation,
        );
        let expands = primary_alignment == VirtualAlignment::Expand;
        if !expands {
            fixed_space += position.primary - start;
        }
        expanding.push(expands);
    }

    let expanding_count = expanding.iter().filter(|e| **e).count();
    let empty_space = container.primary - fixed_space;
    if expanding_count > 0 && empty_space > epsilon {
        let share = empty_space / expanding_count as f64;
        let mut push = 0.0;
        for ((_, bounds), expands) in layout.entries_mut().zip(expanding) {
            let mut v = VirtualRect::from_rect(*bounds, orientation);
            v.primary += push;
            if expands {
                push += share - v.primary_size;
                v.primary_size = share;
            }
            *bounds = v.to_rect(orientation);
        }
    }

    Ok(layout)
}

/// Lay out a linear layout view within its current size and apply the
/// result.
pub fn layout_children(view: &Arc<View>) -> Result<()> {
    calc_container_layout(view, view.size())?.apply()
}
